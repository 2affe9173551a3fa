//! Per-viewer sidebar
//!
//! Fifteen line slots, indexed 0 (bottom) to 14 (top). Every mutation turns
//! into the exact packet sequence the viewer's era expects: below the newest
//! era a line is a one-entity team (with a companion score entry), in the
//! newest era it is a single score upsert. Packets are built and sent before
//! local state changes, so a failed operation leaves the sidebar untouched.

use std::sync::Arc;

use parking_lot::Mutex;
use scorebar_core::{
    colorize, DisplaySlot, ProtocolEra, RenderType, ScorebarError, ScorebarResult, TextColor,
    ViewerId,
};
use scorebar_wire::{
    DisplayObjectivePacket, NumberFormat, ObjectiveMode, ObjectivePacket, ProtocolRegistry,
    ResetScorePacket, ScoreAction, ScorePacket, TeamMode, TeamPacket,
};
use tracing::debug;

use crate::line::split_line;
use crate::sink::PacketSink;

pub const MAX_LINES: usize = 15;
pub const OBJECTIVE_NAME: &str = "sidebar";

/// Legacy clients render at most 32 characters per line and title.
const LEGACY_TEXT_BUDGET: usize = 32;

#[derive(Clone, Copy, PartialEq)]
enum LineAction {
    Create,
    Update,
    Remove,
}

struct SidebarState {
    title: String,
    lines: [Option<String>; MAX_LINES],
    destroyed: bool,
}

/// One viewer's sidebar. All methods serialize on an internal lock, packet
/// order is part of the observable behavior.
pub struct Sidebar {
    viewer: ViewerId,
    registry: Arc<ProtocolRegistry>,
    sink: Arc<dyn PacketSink>,
    state: Mutex<SidebarState>,
}

impl Sidebar {
    /// Creates the backing objective and puts it on the sidebar slot.
    pub fn create(
        viewer: ViewerId,
        registry: Arc<ProtocolRegistry>,
        sink: Arc<dyn PacketSink>,
    ) -> ScorebarResult<Self> {
        let sidebar = Sidebar {
            viewer,
            registry,
            sink,
            state: Mutex::new(SidebarState {
                title: String::new(),
                lines: Default::default(),
                destroyed: false,
            }),
        };
        sidebar.send_objective(ObjectiveMode::Create, "")?;
        sidebar.send_display(true)?;
        debug!(viewer = %viewer, era = %sidebar.registry.era(), "sidebar created");
        Ok(sidebar)
    }

    pub fn viewer(&self) -> ViewerId {
        self.viewer
    }

    pub fn era(&self) -> ProtocolEra {
        self.registry.era()
    }

    /// Sets the title shown above the lines. Legacy viewers reject titles
    /// over the 32 character budget.
    pub fn set_title(&self, title: &str) -> ScorebarResult<()> {
        let mut state = self.state.lock();
        Self::check_alive(&state)?;

        let title = self.colorize(title);
        if self.era() == ProtocolEra::Legacy && title.chars().count() > LEGACY_TEXT_BUDGET {
            return Err(ScorebarError::LineTooLong {
                len: title.chars().count(),
            });
        }

        self.send_objective(ObjectiveMode::Update, &title)?;
        state.title = title;
        Ok(())
    }

    /// Sets one line. An empty slot creates the line, an occupied slot
    /// updates it in place.
    pub fn set_line(&self, index: usize, value: &str) -> ScorebarResult<()> {
        let mut state = self.state.lock();
        Self::check_alive(&state)?;
        self.set_line_locked(&mut state, index, value)
    }

    /// Removes one line. Empty slots are left alone.
    pub fn remove_line(&self, index: usize) -> ScorebarResult<()> {
        let mut state = self.state.lock();
        Self::check_alive(&state)?;
        self.remove_line_locked(&mut state, index)
    }

    /// Replaces the whole board top to bottom: the first entry lands on the
    /// highest used slot, `None` entries leave their slot empty. Existing
    /// lines are cleared first; an empty slice just clears.
    pub fn set_lines(&self, lines: &[Option<String>]) -> ScorebarResult<()> {
        let mut state = self.state.lock();
        Self::check_alive(&state)?;
        if lines.len() > MAX_LINES {
            return Err(ScorebarError::InvalidIndex(lines.len() - 1));
        }

        self.clear_lines_locked(&mut state)?;

        let mut index = lines.len();
        for value in lines {
            index -= 1;
            if let Some(value) = value {
                self.set_line_locked(&mut state, index, value)?;
            }
        }
        Ok(())
    }

    /// Removes every line.
    pub fn remove_lines(&self) -> ScorebarResult<()> {
        let mut state = self.state.lock();
        Self::check_alive(&state)?;
        self.clear_lines_locked(&mut state)
    }

    /// Shows or hides the sidebar without touching its contents.
    pub fn display(&self, visible: bool) -> ScorebarResult<()> {
        let state = self.state.lock();
        Self::check_alive(&state)?;
        self.send_display(visible)
    }

    /// Clears the board, removes the objective and retires this sidebar.
    /// Every later call except `is_destroyed` fails.
    pub fn destroy(&self) -> ScorebarResult<()> {
        let mut state = self.state.lock();
        Self::check_alive(&state)?;
        self.clear_lines_locked(&mut state)?;
        self.send_objective(ObjectiveMode::Remove, "")?;
        state.destroyed = true;
        debug!(viewer = %self.viewer, "sidebar destroyed");
        Ok(())
    }

    pub fn title(&self) -> ScorebarResult<String> {
        let state = self.state.lock();
        Self::check_alive(&state)?;
        Ok(state.title.clone())
    }

    pub fn lines(&self) -> ScorebarResult<[Option<String>; MAX_LINES]> {
        let state = self.state.lock();
        Self::check_alive(&state)?;
        Ok(state.lines.clone())
    }

    pub fn line(&self, index: usize) -> ScorebarResult<Option<String>> {
        let state = self.state.lock();
        Self::check_alive(&state)?;
        if index >= MAX_LINES {
            return Err(ScorebarError::InvalidIndex(index));
        }
        Ok(state.lines[index].clone())
    }

    pub fn is_destroyed(&self) -> bool {
        self.state.lock().destroyed
    }

    fn check_alive(state: &SidebarState) -> ScorebarResult<()> {
        if state.destroyed {
            Err(ScorebarError::AlreadyDestroyed)
        } else {
            Ok(())
        }
    }

    fn colorize(&self, text: &str) -> String {
        colorize(text, self.era().has_hex_colors())
    }

    fn set_line_locked(
        &self,
        state: &mut SidebarState,
        index: usize,
        value: &str,
    ) -> ScorebarResult<()> {
        if index >= MAX_LINES {
            return Err(ScorebarError::InvalidIndex(index));
        }
        let value = self.colorize(value);
        let action = if state.lines[index].is_some() {
            LineAction::Update
        } else {
            LineAction::Create
        };
        self.send_line(index, action, &value)?;
        state.lines[index] = Some(value);
        Ok(())
    }

    fn remove_line_locked(&self, state: &mut SidebarState, index: usize) -> ScorebarResult<()> {
        if index >= MAX_LINES {
            return Err(ScorebarError::InvalidIndex(index));
        }
        if state.lines[index].is_some() {
            self.send_line(index, LineAction::Remove, "")?;
            state.lines[index] = None;
        }
        Ok(())
    }

    fn clear_lines_locked(&self, state: &mut SidebarState) -> ScorebarResult<()> {
        for index in 0..MAX_LINES {
            self.remove_line_locked(state, index)?;
        }
        Ok(())
    }

    /// The invisible score entity backing a line. Slot 0 maps to the
    /// highest code so scoreboard ordering matches visual ordering; legacy
    /// clients additionally need a reset marker to keep entities unique
    /// from team prefixes.
    fn entity_name(&self, index: usize) -> String {
        let color = TextColor::by_ordinal((MAX_LINES - index) as u8).unwrap_or(TextColor::Reset);
        if self.era() == ProtocolEra::Legacy {
            format!("{}{}", color, TextColor::Reset)
        } else {
            color.to_string()
        }
    }

    fn team_name(index: usize) -> String {
        format!("line_{index:02}")
    }

    fn send(&self, packet: bytes::Bytes) {
        self.sink.send(packet);
    }

    fn send_objective(&self, mode: ObjectiveMode, title: &str) -> ScorebarResult<()> {
        let mut packet = ObjectivePacket {
            name: OBJECTIVE_NAME.to_string(),
            mode,
            value: None,
            render_type: None,
            number_format: None,
        };
        if mode != ObjectiveMode::Remove {
            packet.value = Some(title.to_string());
            packet.render_type = Some(RenderType::Integer);
            if self.era().has_number_formats() {
                packet.number_format = Some(NumberFormat::Blank);
            }
        }
        self.send(self.registry.serialize(&packet)?);
        Ok(())
    }

    fn send_display(&self, visible: bool) -> ScorebarResult<()> {
        let packet = DisplayObjectivePacket {
            position: DisplaySlot::Sidebar,
            objective_name: if visible {
                OBJECTIVE_NAME.to_string()
            } else {
                String::new()
            },
        };
        self.send(self.registry.serialize(&packet)?);
        Ok(())
    }

    fn send_line(&self, index: usize, action: LineAction, value: &str) -> ScorebarResult<()> {
        if self.era().has_reset_score() {
            return self.send_line_modern(index, action, value);
        }

        let mode = match action {
            LineAction::Create => TeamMode::Create,
            LineAction::Update => TeamMode::Update,
            LineAction::Remove => TeamMode::Remove,
        };
        let mut team = TeamPacket::new(Self::team_name(index), mode);

        if mode.has_body() {
            if self.era() == ProtocolEra::Legacy {
                let (prefix, suffix) = split_line(value)?;
                team.prefix = prefix;
                team.suffix = suffix;
            } else {
                team.prefix = value.to_string();
            }
        }
        if mode == TeamMode::Create {
            team.entities = vec![self.entity_name(index)];
        }
        self.send(self.registry.serialize(&team)?);

        // updating the team repaints the line; the score entry only changes
        // when the line appears or disappears
        if action != LineAction::Update {
            let mut score = ScorePacket::new(self.entity_name(index));
            score.objective_name = OBJECTIVE_NAME.to_string();
            score.action = Some(match action {
                LineAction::Create => ScoreAction::Create,
                LineAction::Remove => ScoreAction::Remove,
                LineAction::Update => unreachable!(),
            });
            self.send(self.registry.serialize(&score)?);
        }
        Ok(())
    }

    fn send_line_modern(&self, index: usize, action: LineAction, value: &str) -> ScorebarResult<()> {
        match action {
            LineAction::Create | LineAction::Update => {
                let mut score = ScorePacket::new(self.entity_name(index));
                score.objective_name = OBJECTIVE_NAME.to_string();
                score.display_name = Some(value.to_string());
                self.send(self.registry.serialize(&score)?);
            }
            LineAction::Remove => {
                let packet = ResetScorePacket {
                    entity_name: self.entity_name(index),
                    objective_name: Some(OBJECTIVE_NAME.to_string()),
                };
                self.send(self.registry.serialize(&packet)?);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex as TestMutex;
    use scorebar_wire::{AnyPacket, PacketIdSource, PacketKind};

    struct TestIds;

    impl PacketIdSource for TestIds {
        fn packet_id(&self, kind: PacketKind) -> ScorebarResult<i32> {
            Ok(match kind {
                PacketKind::DisplayObjective => 1,
                PacketKind::Objective => 2,
                PacketKind::Team => 3,
                PacketKind::Score => 4,
                PacketKind::ResetScore => 5,
            })
        }
    }

    #[derive(Default)]
    struct MemorySink {
        frames: TestMutex<Vec<bytes::Bytes>>,
    }

    impl PacketSink for MemorySink {
        fn send(&self, packet: bytes::Bytes) {
            self.frames.lock().push(packet);
        }
    }

    fn setup(era: ProtocolEra) -> (Sidebar, Arc<MemorySink>, Arc<ProtocolRegistry>) {
        let registry = Arc::new(ProtocolRegistry::build(era, &TestIds).unwrap());
        let sink = Arc::new(MemorySink::default());
        let sidebar =
            Sidebar::create(ViewerId::new(7), registry.clone(), sink.clone()).unwrap();
        sink.frames.lock().clear();
        (sidebar, sink, registry)
    }

    fn drain(sink: &MemorySink, registry: &ProtocolRegistry) -> Vec<AnyPacket> {
        let frames = std::mem::take(&mut *sink.frames.lock());
        frames
            .iter()
            .map(|f| registry.deserialize(f).unwrap())
            .collect()
    }

    #[test]
    fn test_create_emits_objective_then_display() {
        let registry = Arc::new(ProtocolRegistry::build(ProtocolEra::Component, &TestIds).unwrap());
        let sink = Arc::new(MemorySink::default());
        Sidebar::create(ViewerId::new(1), registry.clone(), sink.clone()).unwrap();

        let packets = drain(&sink, &registry);
        assert_eq!(packets.len(), 2);
        match &packets[0] {
            AnyPacket::Objective(p) => {
                assert_eq!(p.mode, ObjectiveMode::Create);
                assert_eq!(p.name, OBJECTIVE_NAME);
            }
            other => panic!("expected objective, got {:?}", other.kind()),
        }
        match &packets[1] {
            AnyPacket::DisplayObjective(p) => {
                assert_eq!(p.position, DisplaySlot::Sidebar);
                assert_eq!(p.objective_name, OBJECTIVE_NAME);
            }
            other => panic!("expected display objective, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_set_title_updates_objective() {
        let (sidebar, sink, registry) = setup(ProtocolEra::Component);
        sidebar.set_title("&aHello").unwrap();
        assert_eq!(sidebar.title().unwrap(), "§aHello");

        let packets = drain(&sink, &registry);
        match &packets[0] {
            AnyPacket::Objective(p) => {
                assert_eq!(p.mode, ObjectiveMode::Update);
                assert_eq!(p.value.as_deref(), Some("§aHello"));
            }
            other => panic!("expected objective, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_modern_title_carries_blank_format() {
        let (sidebar, sink, registry) = setup(ProtocolEra::Modern);
        sidebar.set_title("t").unwrap();
        match &drain(&sink, &registry)[0] {
            AnyPacket::Objective(p) => assert_eq!(p.number_format, Some(NumberFormat::Blank)),
            other => panic!("expected objective, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_legacy_title_budget() {
        let (sidebar, sink, _) = setup(ProtocolEra::Legacy);
        let err = sidebar.set_title(&"x".repeat(33)).unwrap_err();
        assert!(matches!(err, ScorebarError::LineTooLong { len: 33 }));
        assert!(sink.frames.lock().is_empty());
        assert_eq!(sidebar.title().unwrap(), "");
    }

    #[test]
    fn test_create_line_below_modern_sends_team_and_score() {
        let (sidebar, sink, registry) = setup(ProtocolEra::Component);
        sidebar.set_line(3, "hello").unwrap();

        let packets = drain(&sink, &registry);
        assert_eq!(packets.len(), 2);
        match &packets[0] {
            AnyPacket::Team(p) => {
                assert_eq!(p.mode, TeamMode::Create);
                assert_eq!(p.name, "line_03");
                assert_eq!(p.prefix, "hello");
                // slot 3 backs onto ordinal 12
                assert_eq!(p.entities, vec!["§c".to_string()]);
            }
            other => panic!("expected team, got {:?}", other.kind()),
        }
        match &packets[1] {
            AnyPacket::Score(p) => {
                assert_eq!(p.action, Some(ScoreAction::Create));
                assert_eq!(p.entity_name, "§c");
            }
            other => panic!("expected score, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_update_line_below_modern_sends_team_only() {
        let (sidebar, sink, registry) = setup(ProtocolEra::Component);
        sidebar.set_line(3, "first").unwrap();
        drain(&sink, &registry);

        sidebar.set_line(3, "second").unwrap();
        let packets = drain(&sink, &registry);
        assert_eq!(packets.len(), 1);
        match &packets[0] {
            AnyPacket::Team(p) => {
                assert_eq!(p.mode, TeamMode::Update);
                assert_eq!(p.prefix, "second");
                assert!(p.entities.is_empty());
            }
            other => panic!("expected team, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_legacy_line_splits_across_prefix_and_suffix() {
        let (sidebar, sink, registry) = setup(ProtocolEra::Legacy);
        sidebar.set_line(0, "12345678901234567890").unwrap();

        match &drain(&sink, &registry)[0] {
            AnyPacket::Team(p) => {
                assert_eq!(p.prefix, "1234567890123456");
                assert_eq!(p.suffix, "7890");
            }
            other => panic!("expected team, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_legacy_entity_carries_reset_marker() {
        let (sidebar, sink, registry) = setup(ProtocolEra::Legacy);
        sidebar.set_line(0, "x").unwrap();
        match &drain(&sink, &registry)[0] {
            AnyPacket::Team(p) => assert_eq!(p.entities, vec!["§f§r".to_string()]),
            other => panic!("expected team, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_legacy_over_budget_line_leaves_state_untouched() {
        let (sidebar, sink, _) = setup(ProtocolEra::Legacy);
        let err = sidebar.set_line(2, &"y".repeat(40)).unwrap_err();
        assert!(matches!(err, ScorebarError::LineTooLong { len: 40 }));
        assert!(sink.frames.lock().is_empty());
        assert_eq!(sidebar.line(2).unwrap(), None);
    }

    #[test]
    fn test_modern_line_is_single_upsert() {
        let (sidebar, sink, registry) = setup(ProtocolEra::Modern);
        sidebar.set_line(14, "top").unwrap();

        let packets = drain(&sink, &registry);
        assert_eq!(packets.len(), 1);
        match &packets[0] {
            AnyPacket::Score(p) => {
                assert_eq!(p.entity_name, "§1");
                assert_eq!(p.objective_name, OBJECTIVE_NAME);
                assert_eq!(p.display_name.as_deref(), Some("top"));
                assert_eq!(p.action, None);
            }
            other => panic!("expected score, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_modern_remove_line_resets_score() {
        let (sidebar, sink, registry) = setup(ProtocolEra::Modern);
        sidebar.set_line(5, "gone soon").unwrap();
        drain(&sink, &registry);

        sidebar.remove_line(5).unwrap();
        let packets = drain(&sink, &registry);
        assert_eq!(packets.len(), 1);
        match &packets[0] {
            AnyPacket::ResetScore(p) => {
                assert_eq!(p.objective_name.as_deref(), Some(OBJECTIVE_NAME));
            }
            other => panic!("expected reset score, got {:?}", other.kind()),
        }
        assert_eq!(sidebar.line(5).unwrap(), None);
    }

    #[test]
    fn test_remove_empty_line_sends_nothing() {
        let (sidebar, sink, _) = setup(ProtocolEra::Component);
        sidebar.remove_line(9).unwrap();
        assert!(sink.frames.lock().is_empty());
    }

    #[test]
    fn test_set_lines_inverts_order() {
        let (sidebar, sink, registry) = setup(ProtocolEra::Modern);
        sidebar
            .set_lines(&[
                Some("first".to_string()),
                None,
                Some("third".to_string()),
            ])
            .unwrap();

        // first entry lands on the highest used slot
        assert_eq!(sidebar.line(2).unwrap().as_deref(), Some("first"));
        assert_eq!(sidebar.line(1).unwrap(), None);
        assert_eq!(sidebar.line(0).unwrap().as_deref(), Some("third"));
        assert_eq!(drain(&sink, &registry).len(), 2);
    }

    #[test]
    fn test_set_lines_clears_previous_content() {
        let (sidebar, _, _) = setup(ProtocolEra::Modern);
        sidebar.set_line(10, "old").unwrap();
        sidebar.set_lines(&[Some("only".to_string())]).unwrap();
        assert_eq!(sidebar.line(10).unwrap(), None);
        assert_eq!(sidebar.line(0).unwrap().as_deref(), Some("only"));
    }

    #[test]
    fn test_set_lines_empty_input_clears() {
        let (sidebar, _, _) = setup(ProtocolEra::Component);
        sidebar.set_line(4, "x").unwrap();
        sidebar.set_lines(&[]).unwrap();
        assert!(sidebar.lines().unwrap().iter().all(Option::is_none));
    }

    #[test]
    fn test_set_lines_rejects_more_than_fifteen() {
        let (sidebar, _, _) = setup(ProtocolEra::Component);
        let lines: Vec<Option<String>> = (0..16).map(|i| Some(i.to_string())).collect();
        assert!(matches!(
            sidebar.set_lines(&lines),
            Err(ScorebarError::InvalidIndex(15))
        ));
    }

    #[test]
    fn test_display_toggle() {
        let (sidebar, sink, registry) = setup(ProtocolEra::Component);
        sidebar.display(false).unwrap();
        match &drain(&sink, &registry)[0] {
            AnyPacket::DisplayObjective(p) => assert_eq!(p.objective_name, ""),
            other => panic!("expected display objective, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_destroy_is_final() {
        let (sidebar, sink, registry) = setup(ProtocolEra::Component);
        sidebar.set_line(1, "line").unwrap();
        drain(&sink, &registry);

        sidebar.destroy().unwrap();
        let packets = drain(&sink, &registry);
        // team remove + score remove for the occupied slot, then objective remove
        assert_eq!(packets.len(), 3);
        match packets.last().unwrap() {
            AnyPacket::Objective(p) => assert_eq!(p.mode, ObjectiveMode::Remove),
            other => panic!("expected objective, got {:?}", other.kind()),
        }

        assert!(sidebar.is_destroyed());
        assert!(matches!(
            sidebar.set_title("late"),
            Err(ScorebarError::AlreadyDestroyed)
        ));
        assert!(matches!(sidebar.destroy(), Err(ScorebarError::AlreadyDestroyed)));
        assert!(matches!(sidebar.lines(), Err(ScorebarError::AlreadyDestroyed)));
    }

    #[test]
    fn test_index_out_of_range() {
        let (sidebar, _, _) = setup(ProtocolEra::Component);
        assert!(matches!(
            sidebar.set_line(15, "x"),
            Err(ScorebarError::InvalidIndex(15))
        ));
        assert!(matches!(
            sidebar.remove_line(15),
            Err(ScorebarError::InvalidIndex(15))
        ));
        assert!(matches!(
            sidebar.line(15),
            Err(ScorebarError::InvalidIndex(15))
        ));
    }

    #[test]
    fn test_hex_input_gated_by_era() {
        let (legacy, _, _) = setup(ProtocolEra::Legacy);
        legacy.set_title("&#abc123t").unwrap();
        assert_eq!(legacy.title().unwrap(), "&#abc123t");

        let (modern, _, _) = setup(ProtocolEra::Modern);
        modern.set_title("&#abc123t").unwrap();
        assert_eq!(modern.title().unwrap(), "§x§a§b§c§1§2§3t");
    }
}
