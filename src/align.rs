/// Logical sector alignment for raw image output

/// Build the logical sector sequence an aligned track should contain
///
/// `sorted` must hold unique logical sector numbers in ascending order.
/// Up to `budget` numbers are inserted: gaps between neighbours are filled
/// first, then the sequence is extended past its last element. A gap larger
/// than the remaining budget ends gap filling, and whatever budget is left
/// goes to the extension.
pub fn align_sectors(sorted: &[u8], budget: usize) -> Vec<u16> {
    let Some(&first) = sorted.first() else {
        return Vec::new();
    };

    let mut result = Vec::with_capacity(sorted.len() + budget);
    result.push(u16::from(first));
    let mut remaining = budget;

    for (idx, pair) in sorted.windows(2).enumerate() {
        let (prev, curr) = (u16::from(pair[0]), u16::from(pair[1]));
        let gap = usize::from(curr.saturating_sub(prev + 1));

        if gap > remaining {
            result.extend(sorted[idx + 1..].iter().map(|&s| u16::from(s)));
            break;
        }

        result.extend(prev + 1..curr);
        result.push(curr);
        remaining -= gap;
    }

    if remaining > 0 {
        let last = result.last().copied().unwrap_or(0);
        result.extend((1..=remaining).map(|step| last + step as u16));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_gap_then_extension() {
        assert_eq!(align_sectors(&[0, 2, 5], 2), vec![0, 1, 2, 5, 6]);
    }

    #[test]
    fn test_fill_all_gaps() {
        assert_eq!(align_sectors(&[1, 3, 6], 3), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_extend_only() {
        assert_eq!(align_sectors(&[0, 1, 2], 2), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_zero_budget() {
        assert_eq!(align_sectors(&[0, 4, 9], 0), vec![0, 4, 9]);
    }

    #[test]
    fn test_extension_past_255() {
        assert_eq!(align_sectors(&[254, 255], 2), vec![254, 255, 256, 257]);
    }

    #[test]
    fn test_empty_input() {
        assert!(align_sectors(&[], 4).is_empty());
    }

    proptest! {
        #[test]
        fn prop_aligned_length(set in prop::collection::btree_set(any::<u8>(), 1..64), budget in 0usize..64) {
            let sorted: Vec<u8> = set.into_iter().collect();
            let aligned = align_sectors(&sorted, budget);

            prop_assert_eq!(aligned.len(), sorted.len() + budget);
            prop_assert!(aligned.windows(2).all(|w| w[0] < w[1]));
            for s in &sorted {
                prop_assert!(aligned.contains(&u16::from(*s)));
            }
        }
    }
}
