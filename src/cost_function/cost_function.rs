use crate::elevator_controller::state::ElevatorState;

/// Picks the idle elevator closest to `floor`. Busy cars are never
/// considered. On equal distance the lowest id wins.
pub fn find_nearest_idle_elevator(fleet: &[ElevatorState], floor: u8) -> Option<u8> {
    fleet
        .iter()
        .filter(|elevator| elevator.is_idle())
        .min_by_key(|elevator| elevator.floor.abs_diff(floor))
        .map(|elevator| elevator.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elevator_controller::state::init_fleet;

    fn fleet_at(floors: &[u8]) -> Vec<ElevatorState> {
        let mut fleet = init_fleet(floors.len() as u8);
        for (elevator, floor) in fleet.iter_mut().zip(floors) {
            elevator.floor = *floor;
        }
        fleet
    }

    #[test]
    fn closest_idle_elevator_is_chosen() {
        let fleet = fleet_at(&[2, 7]);
        assert_eq!(find_nearest_idle_elevator(&fleet, 5), Some(1));
    }

    #[test]
    fn tie_goes_to_lowest_id() {
        let fleet = fleet_at(&[3, 7]);
        assert_eq!(find_nearest_idle_elevator(&fleet, 5), Some(0));

        let fleet = fleet_at(&[0, 0, 0]);
        assert_eq!(find_nearest_idle_elevator(&fleet, 5), Some(0));
    }

    #[test]
    fn busy_elevators_are_skipped() {
        let mut fleet = fleet_at(&[5, 0, 9]);
        fleet[0].assign(5);
        assert_eq!(find_nearest_idle_elevator(&fleet, 5), Some(1));
    }

    #[test]
    fn saturated_fleet_has_no_candidate() {
        let mut fleet = fleet_at(&[1, 2]);
        fleet[0].assign(1);
        fleet[1].assign(2);
        assert_eq!(find_nearest_idle_elevator(&fleet, 0), None);
        assert_eq!(find_nearest_idle_elevator(&[], 0), None);
    }
}
