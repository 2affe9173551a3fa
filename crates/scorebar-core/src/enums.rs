//! Scoreboard enums shared by the packet schemas

/// Where an objective is displayed on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DisplaySlot {
    List = 0,
    Sidebar = 1,
    BelowName = 2,
}

impl DisplaySlot {
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0 => Some(DisplaySlot::List),
            1 => Some(DisplaySlot::Sidebar),
            2 => Some(DisplaySlot::BelowName),
            _ => None,
        }
    }

    #[inline]
    pub fn to_byte(self) -> u8 {
        self as u8
    }
}

/// How score values are rendered next to their entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RenderType {
    Integer = 0,
    Hearts = 1,
}

impl RenderType {
    /// Wire value used by the oldest era, which writes this as a string.
    pub fn value(self) -> &'static str {
        match self {
            RenderType::Integer => "integer",
            RenderType::Hearts => "hearts",
        }
    }

    pub fn by_value(value: &str) -> Option<Self> {
        match value {
            "integer" => Some(RenderType::Integer),
            "hearts" => Some(RenderType::Hearts),
            _ => None,
        }
    }

    pub fn from_ordinal(ordinal: i32) -> Option<Self> {
        match ordinal {
            0 => Some(RenderType::Integer),
            1 => Some(RenderType::Hearts),
            _ => None,
        }
    }
}

/// Team name tag visibility rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum NameTagVisibility {
    #[default]
    Always,
    HideForOtherTeams,
    HideForOwnTeam,
    Never,
}

impl NameTagVisibility {
    pub fn value(self) -> &'static str {
        match self {
            NameTagVisibility::Always => "always",
            NameTagVisibility::HideForOtherTeams => "hideForOtherTeams",
            NameTagVisibility::HideForOwnTeam => "hideForOwnTeam",
            NameTagVisibility::Never => "never",
        }
    }

    pub fn by_value(value: &str) -> Option<Self> {
        match value {
            "always" => Some(NameTagVisibility::Always),
            "hideForOtherTeams" => Some(NameTagVisibility::HideForOtherTeams),
            "hideForOwnTeam" => Some(NameTagVisibility::HideForOwnTeam),
            "never" => Some(NameTagVisibility::Never),
            _ => None,
        }
    }
}

/// Team collision rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum CollisionRule {
    #[default]
    Always,
    PushOtherTeams,
    PushOwnTeam,
    Never,
}

impl CollisionRule {
    pub fn value(self) -> &'static str {
        match self {
            CollisionRule::Always => "always",
            CollisionRule::PushOtherTeams => "pushOtherTeams",
            CollisionRule::PushOwnTeam => "pushOwnTeam",
            CollisionRule::Never => "never",
        }
    }

    pub fn by_value(value: &str) -> Option<Self> {
        match value {
            "always" => Some(CollisionRule::Always),
            "pushOtherTeams" => Some(CollisionRule::PushOtherTeams),
            "pushOwnTeam" => Some(CollisionRule::PushOwnTeam),
            "never" => Some(CollisionRule::Never),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_slot_bytes() {
        for slot in [DisplaySlot::List, DisplaySlot::Sidebar, DisplaySlot::BelowName] {
            assert_eq!(DisplaySlot::from_byte(slot.to_byte()), Some(slot));
        }
        assert_eq!(DisplaySlot::from_byte(7), None);
    }

    #[test]
    fn test_render_type_values() {
        assert_eq!(RenderType::by_value("integer"), Some(RenderType::Integer));
        assert_eq!(RenderType::by_value("hearts"), Some(RenderType::Hearts));
        assert_eq!(RenderType::by_value("bogus"), None);
        assert_eq!(RenderType::from_ordinal(1), Some(RenderType::Hearts));
        assert_eq!(RenderType::from_ordinal(2), None);
    }

    #[test]
    fn test_team_rule_values() {
        assert_eq!(
            NameTagVisibility::by_value("hideForOwnTeam"),
            Some(NameTagVisibility::HideForOwnTeam)
        );
        assert_eq!(CollisionRule::by_value("pushOtherTeams"), Some(CollisionRule::PushOtherTeams));
        assert_eq!(CollisionRule::by_value(""), None);
    }
}
