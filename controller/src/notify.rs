use sim_garden_core::{Event, Notification, NotificationKind};

/// Toast text for world events a user cares about.
pub(crate) fn notification_for(event: &Event) -> Option<Notification> {
    let notification = match event {
        Event::SimulationStarted => {
            Notification::new(NotificationKind::Success, "Simulation started")
        }
        Event::SimulationPaused => Notification::new(NotificationKind::Info, "Simulation paused"),
        Event::SimulationReset { .. } => {
            Notification::new(NotificationKind::Info, "Simulation reset")
        }
        Event::OptionSelected { option, .. } => {
            Notification::new(NotificationKind::Info, format!("{} selected", option.name()))
        }
        Event::PatternApplied { pattern, .. } => Notification::new(
            NotificationKind::Success,
            format!("{} applied", pattern.name()),
        ),
        Event::TickRateChanged { rate } => Notification::new(
            NotificationKind::Info,
            format!("Speed set to {} ticks/s", rate.get()),
        ),
        Event::TickRateRejected { error } => {
            Notification::new(NotificationKind::Error, error.to_string())
        }
        _ => return None,
    };
    Some(notification)
}

#[cfg(test)]
mod tests {
    use super::notification_for;
    use sim_garden_core::{Epoch, Event, NotificationKind, TickRateError};

    #[test]
    fn stale_results_stay_silent() {
        assert!(notification_for(&Event::StaleResultDiscarded {
            stale: Epoch::new(1),
            current: Epoch::new(2),
        })
        .is_none());
    }

    #[test]
    fn rejected_rates_surface_as_errors() {
        let notification = notification_for(&Event::TickRateRejected {
            error: TickRateError::NonPositive { requested: 0 },
        })
        .expect("rejection is reported");
        assert_eq!(notification.kind, NotificationKind::Error);
    }
}
