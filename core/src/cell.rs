//! Value cells: the mutable slots fed during parsing.
//!
//! A [`ValueCell`] is generic over its value type but the registry stores
//! every cell behind the object-safe [`Slot`] trait, so options of different
//! types live in one collection. Typed reads go through the handles in
//! [`crate::value`], which keep the concrete `Rc<RefCell<ValueCell<T>>>`.

use std::cell::RefCell;
use std::rc::Rc;

use crate::arg_type::ArgType;
use crate::error::{ArgvError, CellKind, Result};

pub(crate) type DefaultProvider<T> = Rc<dyn Fn() -> T>;

/// What a single-valued cell produces when it was never fed.
pub(crate) enum Presence<T> {
    Mandatory,
    Optional,
    Defaulted(DefaultProvider<T>),
}

/// Arity and optionality of a cell.
pub(crate) enum Arity<T> {
    Single(Presence<T>),
    Many { required: bool },
}

impl<T> Arity<T> {
    pub(crate) fn is_multiple(&self) -> bool {
        matches!(self, Arity::Many { .. })
    }

    pub(crate) fn is_required(&self) -> bool {
        matches!(
            self,
            Arity::Single(Presence::Mandatory) | Arity::Many { required: true }
        )
    }
}

/// Result of [`ValueCell::produce`].
pub(crate) enum Produced<T> {
    One(T),
    Absent,
    Many(Vec<T>),
}

impl<T> Produced<T> {
    pub(crate) fn into_single(self) -> Option<T> {
        match self {
            Produced::One(value) => Some(value),
            Produced::Absent | Produced::Many(_) => None,
        }
    }

    pub(crate) fn into_many(self) -> Vec<T> {
        match self {
            Produced::One(value) => vec![value],
            Produced::Absent => Vec::new(),
            Produced::Many(values) => values,
        }
    }
}

/// Shape of a cell as seen by the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CellSummary {
    /// Placeholder for the consumed token; `None` for switches.
    pub value_name: Option<String>,
    pub multiple: bool,
    pub required: bool,
}

/// Type-erased view of a cell held by the registry.
pub(crate) trait Slot {
    /// Converts and records one raw token.
    fn accept(&mut self, raw: &str) -> Result<()>;

    fn describe(&self) -> CellSummary;

    fn needs_argument(&self) -> bool;

    fn is_multiple(&self) -> bool;
}

pub(crate) type SharedSlot = Rc<RefCell<dyn Slot>>;

fn convert<T>(arg_type: &ArgType<T>, kind: CellKind, name: &str, raw: &str) -> Result<T> {
    arg_type.read(raw).map_err(|reason| ArgvError::InvalidValue {
        kind,
        name: name.to_string(),
        value: raw.to_string(),
        reason,
    })
}

fn describe_value<T>(arg_type: &ArgType<T>, label: &str) -> Option<String> {
    arg_type
        .needs_argument()
        .then(|| arg_type.value_name().unwrap_or(label).to_string())
}

/// A named slot bound to one converter.
pub(crate) struct ValueCell<T> {
    kind: CellKind,
    /// Long name for options, identifier for arguments.
    label: String,
    arg_type: ArgType<T>,
    arity: Arity<T>,
    values: Vec<T>,
}

impl<T: Clone> ValueCell<T> {
    pub(crate) fn new(
        kind: CellKind,
        label: String,
        arg_type: ArgType<T>,
        arity: Arity<T>,
    ) -> Self {
        Self {
            kind,
            label,
            arg_type,
            arity,
            values: Vec::new(),
        }
    }

    /// Name used in error messages: `--long` for options.
    pub(crate) fn display_name(&self) -> String {
        match self.kind {
            CellKind::Option => format!("--{}", self.label),
            CellKind::Argument => self.label.clone(),
        }
    }

    pub(crate) fn is_specified(&self) -> bool {
        !self.values.is_empty()
    }

    pub(crate) fn not_specified(&self) -> ArgvError {
        ArgvError::NotSpecified {
            kind: self.kind,
            name: self.display_name(),
        }
    }

    /// Yields the final value, dispatching once on the cell's arity.
    ///
    /// Default providers are evaluated here, on every read that finds no
    /// specified value.
    pub(crate) fn produce(&self) -> Result<Produced<T>> {
        match &self.arity {
            Arity::Single(presence) => match (self.values.first(), presence) {
                (Some(value), _) => Ok(Produced::One(value.clone())),
                (None, Presence::Mandatory) => Err(self.not_specified()),
                (None, Presence::Optional) => Ok(Produced::Absent),
                (None, Presence::Defaulted(provider)) => Ok(Produced::One(provider())),
            },
            Arity::Many { required: true } if self.values.is_empty() => {
                Err(ArgvError::NoValues(self.display_name()))
            }
            Arity::Many { .. } => Ok(Produced::Many(self.values.clone())),
        }
    }
}

impl<T: Clone> Slot for ValueCell<T> {
    fn accept(&mut self, raw: &str) -> Result<()> {
        let name = self.display_name();
        if !self.arity.is_multiple() && self.is_specified() {
            return Err(ArgvError::AlreadySpecified {
                kind: self.kind,
                name,
            });
        }
        let value = convert(&self.arg_type, self.kind, &name, raw)?;
        self.values.push(value);
        Ok(())
    }

    fn describe(&self) -> CellSummary {
        CellSummary {
            value_name: describe_value(&self.arg_type, &self.label),
            multiple: self.arity.is_multiple(),
            required: self.arity.is_required(),
        }
    }

    fn needs_argument(&self) -> bool {
        self.arg_type.needs_argument()
    }

    fn is_multiple(&self) -> bool {
        self.arity.is_multiple()
    }
}

/// Ordered `(name, value)` pairs shared by every member of an option group.
pub(crate) type GroupValues<T> = Rc<RefCell<Vec<(String, T)>>>;

/// One alternative of an option group; appends to the shared collector.
pub(crate) struct GroupMember<T> {
    name: String,
    long: String,
    arg_type: ArgType<T>,
    collected: GroupValues<T>,
}

impl<T> GroupMember<T> {
    pub(crate) fn new(
        name: String,
        long: String,
        arg_type: ArgType<T>,
        collected: GroupValues<T>,
    ) -> Self {
        Self {
            name,
            long,
            arg_type,
            collected,
        }
    }
}

impl<T> Slot for GroupMember<T> {
    fn accept(&mut self, raw: &str) -> Result<()> {
        let display = format!("--{}", self.long);
        let value = convert(&self.arg_type, CellKind::Option, &display, raw)?;
        self.collected.borrow_mut().push((self.name.clone(), value));
        Ok(())
    }

    fn describe(&self) -> CellSummary {
        CellSummary {
            value_name: describe_value(&self.arg_type, &self.long),
            multiple: true,
            required: false,
        }
    }

    fn needs_argument(&self) -> bool {
        self.arg_type.needs_argument()
    }

    fn is_multiple(&self) -> bool {
        true
    }
}
