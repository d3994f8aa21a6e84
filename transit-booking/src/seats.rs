use std::collections::HashSet;

/// Outcome of removing requested seats from a trip's inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatAllocation {
    /// Inventory left after the allocation, in original order.
    pub seats: Vec<String>,
    pub seats_available: i32,
    /// Requested labels that were present and are now taken.
    pub removed: Vec<String>,
    /// Requested labels absent from the inventory. They do not fail the request.
    pub ignored: Vec<String>,
}

/// Removes every requested label present in `inventory`.
///
/// Never fails: unknown labels are reported in [`SeatAllocation::ignored`] and
/// otherwise dropped, and a label requested twice is removed once. The new
/// `seats_available` is decremented by the number of seats actually removed,
/// so it stays equal to the inventory length whenever it was before.
pub fn allocate(inventory: &[String], seats_available: i32, requested: &[String]) -> SeatAllocation {
    let wanted: HashSet<&str> = requested.iter().map(String::as_str).collect();

    let (removed, seats): (Vec<String>, Vec<String>) = inventory
        .iter()
        .cloned()
        .partition(|seat| wanted.contains(seat.as_str()));

    let present: HashSet<&str> = inventory.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();
    let ignored = requested
        .iter()
        .filter(|label| !present.contains(label.as_str()) && seen.insert(label.as_str()))
        .cloned()
        .collect();

    let taken = i32::try_from(removed.len()).unwrap_or(i32::MAX);

    SeatAllocation {
        seats,
        seats_available: seats_available.saturating_sub(taken),
        removed,
        ignored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_allocate_present_seats() {
        let inventory = labels(&["A1", "A2", "A3"]);
        let result = allocate(&inventory, 3, &labels(&["A1", "A2"]));

        assert_eq!(result.seats, labels(&["A3"]));
        assert_eq!(result.seats_available, 1);
        assert_eq!(result.removed, labels(&["A1", "A2"]));
        assert!(result.ignored.is_empty());
    }

    #[test]
    fn test_inventory_order_preserved() {
        let inventory = labels(&["A1", "A2", "B1", "B2", "C1"]);
        let result = allocate(&inventory, 5, &labels(&["C1", "A2"]));

        assert_eq!(result.seats, labels(&["A1", "B1", "B2"]));
        assert_eq!(result.removed, labels(&["A2", "C1"]));
        assert_eq!(result.seats_available, 3);
    }

    #[test]
    fn test_unknown_labels_ignored() {
        let inventory = labels(&["A1", "A2", "A3"]);
        let result = allocate(&inventory, 3, &labels(&["A1", "Z9"]));

        assert_eq!(result.seats, labels(&["A2", "A3"]));
        assert_eq!(result.seats_available, 2);
        assert_eq!(result.ignored, labels(&["Z9"]));
    }

    #[test]
    fn test_only_unknown_labels_is_a_no_op() {
        let inventory = labels(&["A1", "A2"]);
        let result = allocate(&inventory, 2, &labels(&["X1", "X2", "X1"]));

        assert_eq!(result.seats, inventory);
        assert_eq!(result.seats_available, 2);
        assert!(result.removed.is_empty());
        assert_eq!(result.ignored, labels(&["X1", "X2"]));
    }

    #[test]
    fn test_duplicate_request_removes_once() {
        let inventory = labels(&["A1", "A2", "A3"]);
        let result = allocate(&inventory, 3, &labels(&["A2", "A2"]));

        assert_eq!(result.seats, labels(&["A1", "A3"]));
        assert_eq!(result.seats_available, 2);
    }

    #[test]
    fn test_empty_request() {
        let inventory = labels(&["A1"]);
        let result = allocate(&inventory, 1, &[]);

        assert_eq!(result.seats, inventory);
        assert_eq!(result.seats_available, 1);
    }

    #[test]
    fn test_count_tracks_inventory_length() {
        let inventory: Vec<String> = (1..=40).map(|n| format!("S{}", n)).collect();
        let requests = [
            labels(&["S1", "S2", "S3"]),
            labels(&["S3", "S4", "NOPE"]),
            labels(&["S40", "S40"]),
            labels(&[]),
        ];

        let mut seats = inventory.clone();
        let mut available = seats.len() as i32;
        for request in requests.iter() {
            let result = allocate(&seats, available, request);
            assert_eq!(result.seats_available as usize, result.seats.len());
            assert!(result.removed.iter().all(|s| !result.seats.contains(s)));
            seats = result.seats;
            available = result.seats_available;
        }
        assert_eq!(seats.len(), 35);
    }
}
