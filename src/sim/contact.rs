//! Contact vocabulary reported by the physics host

use serde::{Deserialize, Serialize};

/// What the actor touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContactTag {
    Ground,
    Obstacle,
    Spike,
    Heart,
    Water,
}

impl ContactTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactTag::Ground => "Ground",
            ContactTag::Obstacle => "Obstacle",
            ContactTag::Spike => "Spike",
            ContactTag::Heart => "Heart",
            ContactTag::Water => "Water",
        }
    }

    /// Resolve a host tag name. Unknown tags resolve to `None` and are ignored.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Ground" => Some(ContactTag::Ground),
            "Obstacle" => Some(ContactTag::Obstacle),
            "Spike" => Some(ContactTag::Spike),
            "Heart" => Some(ContactTag::Heart),
            "Water" => Some(ContactTag::Water),
            _ => None,
        }
    }

    /// Surfaces the ball can stand on
    pub fn is_walkable(&self) -> bool {
        matches!(self, ContactTag::Ground | ContactTag::Obstacle)
    }
}

/// Contact notification from the physics host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactEvent {
    CollisionBegin(ContactTag),
    CollisionEnd(ContactTag),
    TriggerEnter(ContactTag),
    TriggerExit(ContactTag),
}

impl ContactEvent {
    pub fn tag(&self) -> ContactTag {
        match *self {
            ContactEvent::CollisionBegin(tag)
            | ContactEvent::CollisionEnd(tag)
            | ContactEvent::TriggerEnter(tag)
            | ContactEvent::TriggerExit(tag) => tag,
        }
    }
}

/// What the host should do with the other object after a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOutcome {
    Keep,
    /// Pickup was used up; destroy it
    Consume,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_names_round_trip() {
        for tag in [
            ContactTag::Ground,
            ContactTag::Obstacle,
            ContactTag::Spike,
            ContactTag::Heart,
            ContactTag::Water,
        ] {
            assert_eq!(ContactTag::from_str(tag.as_str()), Some(tag));
        }
    }

    #[test]
    fn test_unknown_tag() {
        assert_eq!(ContactTag::from_str("Untagged"), None);
        assert_eq!(ContactTag::from_str("ground"), None);
    }

    #[test]
    fn test_walkable() {
        assert!(ContactTag::Ground.is_walkable());
        assert!(ContactTag::Obstacle.is_walkable());
        assert!(!ContactTag::Spike.is_walkable());
        assert!(!ContactTag::Water.is_walkable());
    }
}
