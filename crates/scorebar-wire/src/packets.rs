//! The scoreboard packet family
//!
//! Five clientbound schemas. Each one carries its logical fields and knows
//! how to encode itself for a given era codec; era differences in field
//! order and representation live entirely in the `read`/`write` bodies.
//! Fields that an era cannot express are rejected before a single byte is
//! written, a failed `write` never leaves a partial packet behind.

use scorebar_core::{
    CollisionRule, DisplaySlot, NameTagVisibility, ProtocolEra, RenderType, ScorebarError,
    ScorebarResult, TextColor,
};

use crate::codec::ComponentCodec;
use crate::format::NumberFormat;
use crate::serializer::{PacketReader, PacketWriter};

/// The packet kinds of the family. `ResetScore` exists only in the newest
/// era.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PacketKind {
    DisplayObjective,
    Objective,
    Team,
    Score,
    ResetScore,
}

/// A packet schema: logical fields in, era-shaped bytes out.
pub trait Packet: Sized {
    fn kind(&self) -> PacketKind;

    fn read(r: &mut PacketReader<'_>, codec: &dyn ComponentCodec) -> ScorebarResult<Self>;

    fn write(&self, w: &mut PacketWriter, codec: &dyn ComponentCodec) -> ScorebarResult<()>;
}

/// A decoded packet of any kind.
#[derive(Clone, Debug, PartialEq)]
pub enum AnyPacket {
    DisplayObjective(DisplayObjectivePacket),
    Objective(ObjectivePacket),
    Team(TeamPacket),
    Score(ScorePacket),
    ResetScore(ResetScorePacket),
}

impl AnyPacket {
    pub fn kind(&self) -> PacketKind {
        match self {
            AnyPacket::DisplayObjective(_) => PacketKind::DisplayObjective,
            AnyPacket::Objective(_) => PacketKind::Objective,
            AnyPacket::Team(_) => PacketKind::Team,
            AnyPacket::Score(_) => PacketKind::Score,
            AnyPacket::ResetScore(_) => PacketKind::ResetScore,
        }
    }
}

/// Binds an objective to a display position.
///
/// An empty objective name clears the position.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayObjectivePacket {
    pub position: DisplaySlot,
    pub objective_name: String,
}

impl Packet for DisplayObjectivePacket {
    fn kind(&self) -> PacketKind {
        PacketKind::DisplayObjective
    }

    fn read(r: &mut PacketReader<'_>, codec: &dyn ComponentCodec) -> ScorebarResult<Self> {
        let position = if codec.era() == ProtocolEra::Modern {
            let value = r.read_var_int()?;
            u8::try_from(value)
                .ok()
                .and_then(DisplaySlot::from_byte)
                .ok_or(ScorebarError::UnknownEnumValue {
                    kind: "display position",
                    value,
                })?
        } else {
            let value = r.read_byte()?;
            DisplaySlot::from_byte(value).ok_or(ScorebarError::UnknownEnumValue {
                kind: "display position",
                value: value as i32,
            })?
        };
        let objective_name = r.read_string()?;
        Ok(DisplayObjectivePacket {
            position,
            objective_name,
        })
    }

    fn write(&self, w: &mut PacketWriter, codec: &dyn ComponentCodec) -> ScorebarResult<()> {
        if codec.era() == ProtocolEra::Modern {
            w.write_var_int(self.position.to_byte() as i32);
        } else {
            w.write_byte(self.position.to_byte());
        }
        w.write_string(&self.objective_name);
        Ok(())
    }
}

/// Objective lifecycle mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum ObjectiveMode {
    Create = 0,
    Remove = 1,
    Update = 2,
}

impl ObjectiveMode {
    fn from_byte(b: u8) -> ScorebarResult<Self> {
        match b {
            0 => Ok(ObjectiveMode::Create),
            1 => Ok(ObjectiveMode::Remove),
            2 => Ok(ObjectiveMode::Update),
            other => Err(ScorebarError::UnknownEnumValue {
                kind: "objective mode",
                value: other as i32,
            }),
        }
    }
}

/// Creates, removes or retitles an objective.
///
/// `value` and `render_type` are required unless the mode is `Remove`.
/// `number_format` is writable only in the newest era.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectivePacket {
    pub name: String,
    pub mode: ObjectiveMode,
    pub value: Option<String>,
    pub render_type: Option<RenderType>,
    pub number_format: Option<NumberFormat>,
}

impl Packet for ObjectivePacket {
    fn kind(&self) -> PacketKind {
        PacketKind::Objective
    }

    fn read(r: &mut PacketReader<'_>, codec: &dyn ComponentCodec) -> ScorebarResult<Self> {
        let era = codec.era();
        let name = r.read_string()?;
        let mode = ObjectiveMode::from_byte(r.read_byte()?)?;

        let mut value = None;
        let mut render_type = None;
        let mut number_format = None;

        if mode != ObjectiveMode::Remove {
            if era.has_structured_text() {
                value = Some(codec.read_component(r)?);
                render_type = Some(read_render_type_enum(r)?);
            } else {
                value = Some(r.read_string()?);
                let raw = r.read_string()?;
                render_type = Some(RenderType::by_value(&raw).ok_or_else(|| {
                    ScorebarError::InvalidWireFormat(format!("unknown render type {raw:?}"))
                })?);
            }
            if era.has_number_formats() {
                number_format = r.read_option(|r| codec.read_number_format(r))?;
            }
        }

        Ok(ObjectivePacket {
            name,
            mode,
            value,
            render_type,
            number_format,
        })
    }

    fn write(&self, w: &mut PacketWriter, codec: &dyn ComponentCodec) -> ScorebarResult<()> {
        let era = codec.era();
        if self.number_format.is_some() && !era.has_number_formats() {
            return Err(ScorebarError::UnsupportedForEra {
                feature: "objective number format",
                era,
            });
        }

        let (value, render_type) = if self.mode != ObjectiveMode::Remove {
            let value = self
                .value
                .as_deref()
                .ok_or(ScorebarError::MissingField("objective value"))?;
            let render_type = self
                .render_type
                .ok_or(ScorebarError::MissingField("objective render type"))?;
            (Some(value), Some(render_type))
        } else {
            (None, None)
        };

        w.write_string(&self.name);
        w.write_byte(self.mode as u8);

        if let (Some(value), Some(render_type)) = (value, render_type) {
            if era.has_structured_text() {
                codec.write_component(w, value);
                w.write_var_int(render_type as i32);
            } else {
                w.write_string(value);
                w.write_string(render_type.value());
            }
            if era.has_number_formats() {
                w.write_option(self.number_format.as_ref(), |w, format| {
                    codec.write_number_format(w, format)
                })?;
            }
        }
        Ok(())
    }
}

fn read_render_type_enum(r: &mut PacketReader<'_>) -> ScorebarResult<RenderType> {
    let value = r.read_var_int()?;
    RenderType::from_ordinal(value).ok_or(ScorebarError::UnknownEnumValue {
        kind: "render type",
        value,
    })
}

/// Team lifecycle mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum TeamMode {
    Create = 0,
    Remove = 1,
    Update = 2,
    AddEntities = 3,
    RemoveEntities = 4,
}

impl TeamMode {
    fn from_byte(b: u8) -> ScorebarResult<Self> {
        match b {
            0 => Ok(TeamMode::Create),
            1 => Ok(TeamMode::Remove),
            2 => Ok(TeamMode::Update),
            3 => Ok(TeamMode::AddEntities),
            4 => Ok(TeamMode::RemoveEntities),
            other => Err(ScorebarError::UnknownEnumValue {
                kind: "team mode",
                value: other as i32,
            }),
        }
    }

    /// Create and Update carry the display fields.
    pub fn has_body(self) -> bool {
        matches!(self, TeamMode::Create | TeamMode::Update)
    }

    /// Create and the two entity-edit modes carry the entity list.
    pub fn has_entities(self) -> bool {
        matches!(
            self,
            TeamMode::Create | TeamMode::AddEntities | TeamMode::RemoveEntities
        )
    }
}

/// Creates, updates or removes a team, or edits its entity list.
///
/// The oldest era writes `display_name`/`prefix`/`suffix` first as raw
/// strings; the newer eras write the display component, then the shared
/// fields, then prefix and suffix as components.
#[derive(Clone, Debug, PartialEq)]
pub struct TeamPacket {
    pub name: String,
    pub mode: TeamMode,
    pub display_name: String,
    pub prefix: String,
    pub suffix: String,
    pub friendly_flags: u8,
    pub name_tag_visibility: NameTagVisibility,
    pub collision_rule: CollisionRule,
    pub color: TextColor,
    pub entities: Vec<String>,
}

impl TeamPacket {
    pub fn new(name: impl Into<String>, mode: TeamMode) -> Self {
        TeamPacket {
            name: name.into(),
            mode,
            display_name: String::new(),
            prefix: String::new(),
            suffix: String::new(),
            friendly_flags: 0,
            name_tag_visibility: NameTagVisibility::default(),
            collision_rule: CollisionRule::default(),
            color: TextColor::Reset,
            entities: Vec::new(),
        }
    }
}

impl Packet for TeamPacket {
    fn kind(&self) -> PacketKind {
        PacketKind::Team
    }

    fn read(r: &mut PacketReader<'_>, codec: &dyn ComponentCodec) -> ScorebarResult<Self> {
        let era = codec.era();
        let name = r.read_string()?;
        let mode = TeamMode::from_byte(r.read_byte()?)?;
        let mut packet = TeamPacket::new(name, mode);

        if mode.has_body() {
            if era.has_structured_text() {
                packet.display_name = codec.read_component(r)?;
                packet.friendly_flags = r.read_byte()?;
                packet.name_tag_visibility = read_visibility(r)?;
                packet.collision_rule = read_collision(r)?;
                packet.color = read_team_color(r.read_var_int()?)?;
                packet.prefix = codec.read_component(r)?;
                packet.suffix = codec.read_component(r)?;
            } else {
                packet.display_name = r.read_string()?;
                packet.prefix = r.read_string()?;
                packet.suffix = r.read_string()?;
                packet.friendly_flags = r.read_byte()?;
                packet.name_tag_visibility = read_visibility(r)?;
                packet.collision_rule = read_collision(r)?;
                packet.color = read_team_color(r.read_byte()? as i32)?;
            }
        }
        if mode.has_entities() {
            packet.entities = r.read_collection(|r| r.read_string())?;
        }
        Ok(packet)
    }

    fn write(&self, w: &mut PacketWriter, codec: &dyn ComponentCodec) -> ScorebarResult<()> {
        let era = codec.era();
        w.write_string(&self.name);
        w.write_byte(self.mode as u8);

        if self.mode.has_body() {
            if era.has_structured_text() {
                codec.write_component(w, &self.display_name);
                w.write_byte(self.friendly_flags);
                w.write_string(self.name_tag_visibility.value());
                w.write_string(self.collision_rule.value());
                w.write_var_int(self.color.ordinal() as i32);
                codec.write_component(w, &self.prefix);
                codec.write_component(w, &self.suffix);
            } else {
                w.write_string(&self.display_name);
                w.write_string(&self.prefix);
                w.write_string(&self.suffix);
                w.write_byte(self.friendly_flags);
                w.write_string(self.name_tag_visibility.value());
                w.write_string(self.collision_rule.value());
                w.write_byte(self.color.ordinal());
            }
        }
        if self.mode.has_entities() {
            w.write_collection(&self.entities, |w, entity| {
                w.write_string(entity);
                Ok(())
            })?;
        }
        Ok(())
    }
}

fn read_visibility(r: &mut PacketReader<'_>) -> ScorebarResult<NameTagVisibility> {
    let raw = r.read_string()?;
    NameTagVisibility::by_value(&raw).ok_or_else(|| {
        ScorebarError::InvalidWireFormat(format!("unknown name tag visibility {raw:?}"))
    })
}

fn read_collision(r: &mut PacketReader<'_>) -> ScorebarResult<CollisionRule> {
    let raw = r.read_string()?;
    CollisionRule::by_value(&raw)
        .ok_or_else(|| ScorebarError::InvalidWireFormat(format!("unknown collision rule {raw:?}")))
}

fn read_team_color(value: i32) -> ScorebarResult<TextColor> {
    u8::try_from(value)
        .ok()
        .and_then(TextColor::by_ordinal)
        .ok_or(ScorebarError::UnknownEnumValue {
            kind: "team color",
            value,
        })
}

/// Score lifecycle action, carried only below the newest era.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum ScoreAction {
    Create = 0,
    Remove = 1,
    Update = 2,
}

impl ScoreAction {
    fn from_byte(b: u8) -> ScorebarResult<Self> {
        match b {
            0 => Ok(ScoreAction::Create),
            1 => Ok(ScoreAction::Remove),
            2 => Ok(ScoreAction::Update),
            other => Err(ScorebarError::UnknownEnumValue {
                kind: "score action",
                value: other as i32,
            }),
        }
    }
}

/// Sets or removes a score entry.
///
/// Below the newest era the packet is action driven and the objective and
/// value travel only on `Update`. The newest era drops the action: every
/// packet is an upsert carrying optional display text and number format.
#[derive(Clone, Debug, PartialEq)]
pub struct ScorePacket {
    pub entity_name: String,
    pub objective_name: String,
    pub value: i32,
    pub action: Option<ScoreAction>,
    pub display_name: Option<String>,
    pub number_format: Option<NumberFormat>,
}

impl ScorePacket {
    pub fn new(entity_name: impl Into<String>) -> Self {
        ScorePacket {
            entity_name: entity_name.into(),
            objective_name: String::new(),
            value: 0,
            action: None,
            display_name: None,
            number_format: None,
        }
    }
}

impl Packet for ScorePacket {
    fn kind(&self) -> PacketKind {
        PacketKind::Score
    }

    fn read(r: &mut PacketReader<'_>, codec: &dyn ComponentCodec) -> ScorebarResult<Self> {
        let era = codec.era();
        let mut packet = ScorePacket::new(r.read_string()?);

        if era.has_number_formats() {
            packet.objective_name = r.read_string()?;
            packet.value = r.read_var_int()?;
            packet.display_name = r.read_option(|r| codec.read_component(r))?;
            packet.number_format = r.read_option(|r| codec.read_number_format(r))?;
        } else {
            let action = ScoreAction::from_byte(r.read_byte()?)?;
            packet.action = Some(action);
            if action == ScoreAction::Update {
                packet.objective_name = r.read_string()?;
                packet.value = r.read_var_int()?;
            }
        }
        Ok(packet)
    }

    fn write(&self, w: &mut PacketWriter, codec: &dyn ComponentCodec) -> ScorebarResult<()> {
        let era = codec.era();

        if era.has_number_formats() {
            if self.action.is_some() {
                return Err(ScorebarError::UnsupportedForEra {
                    feature: "score action",
                    era,
                });
            }
            w.write_string(&self.entity_name);
            w.write_string(&self.objective_name);
            w.write_var_int(self.value);
            w.write_option(self.display_name.as_deref(), |w, name| {
                codec.write_component(w, name);
                Ok(())
            })?;
            w.write_option(self.number_format.as_ref(), |w, format| {
                codec.write_number_format(w, format)
            })?;
        } else {
            if self.display_name.is_some() {
                return Err(ScorebarError::UnsupportedForEra {
                    feature: "score display name",
                    era,
                });
            }
            if self.number_format.is_some() {
                return Err(ScorebarError::UnsupportedForEra {
                    feature: "score number format",
                    era,
                });
            }
            let action = self
                .action
                .ok_or(ScorebarError::MissingField("score action"))?;
            w.write_string(&self.entity_name);
            w.write_byte(action as u8);
            if action == ScoreAction::Update {
                w.write_string(&self.objective_name);
                w.write_var_int(self.value);
            }
        }
        Ok(())
    }
}

/// Removes a score entry, or every entry of an entity when the objective is
/// absent. Exists only in the newest era.
#[derive(Clone, Debug, PartialEq)]
pub struct ResetScorePacket {
    pub entity_name: String,
    pub objective_name: Option<String>,
}

impl Packet for ResetScorePacket {
    fn kind(&self) -> PacketKind {
        PacketKind::ResetScore
    }

    fn read(r: &mut PacketReader<'_>, codec: &dyn ComponentCodec) -> ScorebarResult<Self> {
        require_reset_score(codec.era())?;
        Ok(ResetScorePacket {
            entity_name: r.read_string()?,
            objective_name: r.read_option(|r| r.read_string())?,
        })
    }

    fn write(&self, w: &mut PacketWriter, codec: &dyn ComponentCodec) -> ScorebarResult<()> {
        require_reset_score(codec.era())?;
        w.write_string(&self.entity_name);
        w.write_option(self.objective_name.as_deref(), |w, name| {
            w.write_string(name);
            Ok(())
        })?;
        Ok(())
    }
}

fn require_reset_score(era: ProtocolEra) -> ScorebarResult<()> {
    if era.has_reset_score() {
        Ok(())
    } else {
        Err(ScorebarError::UnsupportedForEra {
            feature: "score reset",
            era,
        })
    }
}
