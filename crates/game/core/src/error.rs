//! Common error infrastructure for game-core.
//!
//! Three families cover every failure the rules core can produce:
//!
//! - [`ContentError`]: a broken content definition (unknown name, missing or
//!   mistyped required parameter, malformed speed tier). Always fatal at
//!   load/instantiation time and never recovered at play time.
//! - [`InputError`]: an illegal player input (wrong selection cardinality,
//!   stale target, actor mismatch). Always recoverable: the engine reports a
//!   single clarifying line and re-prompts the same sub-state.
//! - [`InvariantError`]: a programming-invariant breach (character missing
//!   from the battlefield, cleanup with no focused character). Propagated
//!   and halts the current game action rather than silently recovering.

use crate::entity::{CharacterId, ParamKind};

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorSeverity {
    /// Recoverable error - report to the actor and re-prompt.
    Recoverable,

    /// Validation error - invalid definition, rejected without retry.
    Validation,

    /// Internal error - unexpected state inconsistency. Indicates a bug.
    Internal,

    /// Fatal error - broken content or corrupted state, cannot continue.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Common trait implemented by all error types in the rules core.
pub trait GameError {
    /// Returns the severity classification for this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a stable machine-readable error code.
    fn error_code(&self) -> &'static str;
}

// ============================================================================
// Content Errors
// ============================================================================

/// Which registry table a failed lookup was aimed at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ContentKind {
    Ability,
    Effect,
    Item,
    Creature,
    Class,
    Room,
    Floor,
    Encounter,
    Interactable,
}

/// Errors raised while resolving or instantiating content definitions.
///
/// These always indicate a broken content definition, not a runtime game
/// condition, and surface as process-level failures.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ContentError {
    /// No template registered under the requested name.
    #[error("unknown {kind} '{name}'")]
    NotFound { kind: ContentKind, name: String },

    /// A required hook parameter was not supplied at construction.
    #[error("effect '{effect}' requires parameter '{param}'")]
    MissingParam {
        effect: String,
        param: &'static str,
    },

    /// A required hook parameter was supplied with the wrong kind.
    #[error("effect '{effect}' parameter '{param}' must be {expected}")]
    ParamType {
        effect: String,
        param: &'static str,
        expected: ParamKind,
    },

    /// A speed tier string that is not SLOW, NORMAL, or FAST.
    #[error("unrecognized speed tier '{0}'")]
    UnknownSpeed(String),

    /// An unowned combatant whose behavior cannot resolve a turn.
    #[error("creature '{0}' has no turn logic but is not player-controlled")]
    MissingTurnLogic(String),

    /// Any other malformed definition discovered while loading.
    #[error("bad definition '{name}': {reason}")]
    BadDefinition { name: String, reason: String },
}

impl GameError for ContentError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        use ContentError::*;
        match self {
            NotFound { .. } => "CONTENT_NOT_FOUND",
            MissingParam { .. } => "CONTENT_MISSING_PARAM",
            ParamType { .. } => "CONTENT_PARAM_TYPE",
            UnknownSpeed(_) => "CONTENT_UNKNOWN_SPEED",
            MissingTurnLogic(_) => "CONTENT_MISSING_TURN_LOGIC",
            BadDefinition { .. } => "CONTENT_BAD_DEFINITION",
        }
    }
}

// ============================================================================
// Input Errors
// ============================================================================

/// Errors raised by illegal player input.
///
/// Never corrupts engine state: the offending event is rejected wholesale
/// and the active menu stays open for retry. The `Display` text doubles as
/// the clarifying narration line sent back to the actor.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    /// Event attributed to an actor who does not hold focus.
    #[error("it is not your turn")]
    NotYourTurn,

    /// Confirm with nothing selected.
    #[error("nothing is selected")]
    EmptySelection,

    /// Confirm with more selections than the action allows.
    #[error("too many selections, pick at most {max}")]
    TooManySelections { max: u32 },

    /// Confirm on a single-choice menu without exactly one selection.
    #[error("pick exactly one option")]
    ExactlyOneRequired,

    /// Ground transfer mixing pickup and drop in one confirm.
    #[error("pick up or drop, not both at once")]
    MixedTransfer,

    /// A selected target is no longer valid (died or left the menu).
    #[error("that target is no longer valid")]
    StaleSelection,

    /// Battle affordance confirmed in a room with nothing to fight.
    #[error("there is nothing here to fight")]
    NothingToFight,

    /// A toggled icon that has no meaning in the current state.
    #[error("that option is not available right now")]
    NoSuchOption,
}

impl GameError for InputError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        use InputError::*;
        match self {
            NotYourTurn => "INPUT_NOT_YOUR_TURN",
            EmptySelection => "INPUT_EMPTY_SELECTION",
            TooManySelections { .. } => "INPUT_TOO_MANY_SELECTIONS",
            ExactlyOneRequired => "INPUT_EXACTLY_ONE_REQUIRED",
            MixedTransfer => "INPUT_MIXED_TRANSFER",
            StaleSelection => "INPUT_STALE_SELECTION",
            NothingToFight => "INPUT_NOTHING_TO_FIGHT",
            NoSuchOption => "INPUT_NO_SUCH_OPTION",
        }
    }
}

// ============================================================================
// Invariant Errors
// ============================================================================

/// Programming-invariant violations.
///
/// These are bugs, not game conditions. The current action is halted and the
/// error propagated; no silent recovery is attempted.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvariantError {
    /// An id that does not resolve in the entity arena.
    #[error("character {0} not found in entity arena")]
    CharacterNotFound(CharacterId),

    /// A combatant expected on the battlefield is not in any slot.
    #[error("character {0} is not on the battlefield")]
    NotOnBattlefield(CharacterId),

    /// Turn cleanup invoked while no character holds focus.
    #[error("cleanup invoked with no focused character")]
    NoFocus,

    /// An ability source that no longer resolves on its owner.
    #[error("ability source no longer resolves")]
    DanglingAbility,

    /// The current room location points outside the floor grid.
    #[error("current room location is outside the floor grid")]
    RoomOutOfBounds,
}

impl GameError for InvariantError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        use InvariantError::*;
        match self {
            CharacterNotFound(_) => "INVARIANT_CHARACTER_NOT_FOUND",
            NotOnBattlefield(_) => "INVARIANT_NOT_ON_BATTLEFIELD",
            NoFocus => "INVARIANT_NO_FOCUS",
            DanglingAbility => "INVARIANT_DANGLING_ABILITY",
            RoomOutOfBounds => "INVARIANT_ROOM_OUT_OF_BOUNDS",
        }
    }
}

/// Top-level error returned by [`crate::engine::Game::handle_input`].
///
/// Recoverable input problems never surface here; they are narrated back to
/// the actor and the event is dropped. Only content and invariant failures
/// abort the current action.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    Invariant(#[from] InvariantError),
}

impl GameError for EngineError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Content(e) => e.severity(),
            Self::Invariant(e) => e.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Content(e) => e.error_code(),
            Self::Invariant(e) => e.error_code(),
        }
    }
}
