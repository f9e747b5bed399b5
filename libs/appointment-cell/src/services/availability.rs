// libs/appointment-cell/src/services/availability.rs
use chrono::NaiveTime;
use std::collections::HashSet;

use doctor_cell::models::WorkingHours;

/// Clinic-wide candidate times: half-hour steps over a morning and an
/// afternoon block, with a lunch gap from 12:00 to 14:00.
pub fn slot_grid() -> Vec<NaiveTime> {
    [
        (9, 0),
        (9, 30),
        (10, 0),
        (10, 30),
        (11, 0),
        (11, 30),
        (14, 0),
        (14, 30),
        (15, 0),
        (15, 30),
        (16, 0),
        (16, 30),
    ]
    .into_iter()
    .map(|(h, m)| NaiveTime::from_hms_opt(h, m, 0).unwrap())
    .collect()
}

/// Pure slot filter. A grid time is bookable iff it is not already booked
/// and it falls within the working hours, boundaries included. Absent
/// working hours (including unparsable strings upstream) pass everything.
/// Grid order is preserved.
pub fn available_slots(
    working_hours: Option<WorkingHours>,
    booked_times: &HashSet<NaiveTime>,
    grid: &[NaiveTime],
) -> Vec<NaiveTime> {
    grid.iter()
        .copied()
        .filter(|slot| !booked_times.contains(slot))
        .filter(|slot| match working_hours {
            Some(hours) => hours.contains(*slot),
            None => true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn empty_ledger_and_no_hours_returns_whole_grid() {
        let grid = slot_grid();
        let open = available_slots(None, &HashSet::new(), &grid);
        assert_eq!(open, grid);
    }

    #[test]
    fn booked_times_are_excluded() {
        let grid = slot_grid();
        let booked: HashSet<_> = [t(9, 0), t(14, 30)].into();
        let open = available_slots(None, &booked, &grid);
        assert_eq!(open.len(), grid.len() - 2);
        assert!(!open.contains(&t(9, 0)));
        assert!(!open.contains(&t(14, 30)));
    }

    #[test]
    fn working_hours_boundaries_are_bookable() {
        let hours: WorkingHours = "09:30-16:00".parse().unwrap();
        let open = available_slots(Some(hours), &HashSet::new(), &slot_grid());
        assert!(open.contains(&t(9, 30)));
        assert!(open.contains(&t(16, 0)));
        assert!(!open.contains(&t(9, 0)));
        assert!(!open.contains(&t(16, 30)));
    }

    #[test]
    fn result_preserves_grid_order() {
        let booked: HashSet<_> = [t(10, 0)].into();
        let open = available_slots(None, &booked, &slot_grid());
        let mut sorted = open.clone();
        sorted.sort();
        assert_eq!(open, sorted);
    }

    #[test]
    fn morning_only_doctor() {
        let hours: WorkingHours = "09:00-12:00".parse().unwrap();
        let open = available_slots(Some(hours), &HashSet::new(), &slot_grid());
        assert_eq!(
            open,
            vec![t(9, 0), t(9, 30), t(10, 0), t(10, 30), t(11, 0), t(11, 30)]
        );
    }
}
