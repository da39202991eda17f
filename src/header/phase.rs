use std::fmt;

/// The current display mode of the header.
///
/// Exactly one phase is current at any instant. The declaration order is not
/// the order the timeline visits them in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Nothing but the search icon and avatar; the logo has faded out.
    Undefined,
    /// "Google Play" logo and wordmark.
    #[default]
    LogoShown,
    /// "Search for apps & ..." with the mic icon.
    SearchTextShown,
    /// Green badge with the bell.
    NotificationShown,
    /// Badge with the bell and the notification count.
    NotificationTextShown,
}

impl Phase {
    pub const ALL: [Phase; 5] = [
        Phase::Undefined,
        Phase::LogoShown,
        Phase::SearchTextShown,
        Phase::NotificationShown,
        Phase::NotificationTextShown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Undefined => "undefined",
            Phase::LogoShown => "logo",
            Phase::SearchTextShown => "search-text",
            Phase::NotificationShown => "notification",
            Phase::NotificationTextShown => "notification-text",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_initial_phase_is_logo() {
        assert_eq!(Phase::default(), Phase::LogoShown);
    }

    #[test]
    fn test_labels_are_distinct() {
        let labels: HashSet<_> = Phase::ALL.iter().map(Phase::as_str).collect();
        assert_eq!(labels.len(), Phase::ALL.len());
        assert_eq!(Phase::NotificationTextShown.to_string(), "notification-text");
    }
}
