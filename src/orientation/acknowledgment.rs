/// Topics the worker acknowledges having been trained on
pub const SAFETY_TOPICS: [&str; 22] = [
    "Safety Policy (Management & Employee commitments)",
    "Assignment of Responsibility",
    "Hazard Assessment Policy (Annual/Project/FLHA)",
    "Safe Work Practices and Job Procedures",
    "Safety Rules and Disciplinary Policy",
    "PPE Policy (Mandatory & Situational)",
    "Maintenance and Training Policy",
    "Inspection Policy",
    "Incident Investigation Policy",
    "Emergency Rescue Plan & Numbers",
    "Drug/Alcohol Policy",
    "Harassment Code of Practice",
    "Violence in the Workplace Policy",
    "Lock Out Policy",
    "Fall Protection",
    "Respiratory Protection",
    "Confined Space Entry",
    "Hot Work Procedures",
    "Working Alone Policy",
    "Right to Know about hazards",
    "Right to Refuse unsafe work",
    "Right to Participate in safety decisions",
];

/// Distance from the bottom of the topic list that still counts as read
pub const SCROLL_END_TOLERANCE: f64 = 20.0;

/// Gate in front of the signature: the topic list must be read to the end
/// and the worker must confirm before signing is offered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcknowledgmentReview {
    read_to_end: bool,
    confirmed: bool,
}

impl AcknowledgmentReview {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a scroll position of the topic list
    pub fn scrolled(&mut self, scroll_top: f64, scroll_height: f64, client_height: f64) {
        if scroll_top + client_height >= scroll_height - SCROLL_END_TOLERANCE {
            self.read_to_end = true;
        }
    }

    /// The whole list was shown at once (no scrolling needed)
    pub fn mark_read(&mut self) {
        self.read_to_end = true;
    }

    /// Tick the confirmation box; only possible once the list was read
    pub fn confirm(&mut self) -> bool {
        if self.read_to_end {
            self.confirmed = true;
        }
        self.confirmed
    }

    pub fn has_read(&self) -> bool {
        self.read_to_end
    }

    pub fn can_sign(&self) -> bool {
        self.read_to_end && self.confirmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirmation_requires_reading_to_the_end() {
        let mut review = AcknowledgmentReview::new();
        assert!(!review.confirm());

        review.scrolled(100.0, 1000.0, 400.0);
        assert!(!review.has_read());

        review.scrolled(585.0, 1000.0, 400.0);
        assert!(review.has_read());
        assert!(!review.can_sign());
        assert!(review.confirm());
        assert!(review.can_sign());
    }

    #[test]
    fn test_topic_list_is_complete() {
        assert_eq!(SAFETY_TOPICS.len(), 22);
        assert!(SAFETY_TOPICS.contains(&"Right to Refuse unsafe work"));
    }
}
