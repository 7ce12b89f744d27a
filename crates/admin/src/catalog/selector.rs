//! Cascading selector state machine.
//!
//! ```text
//! Empty ──begin──▶ Loading ──finish(Ok)──▶ Populated
//!                     │
//!                     └──finish(Err)──▶ Empty (error kept for display)
//! ```
//!
//! Every `begin` or `reset` advances the selector's generation. A response
//! is applied only if it carries the ticket of the current generation, so a
//! slow response for an earlier selection can never overwrite a newer one.

use catalog_sync_core::{Category, CategoryId, Subcategory, SubcategoryId};

/// Token handed out when a load starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

/// Monotonic counter issuing [`Ticket`]s.
#[derive(Debug, Clone, Default)]
pub struct Generation(u64);

impl Generation {
    /// Start a new generation and return its ticket.
    pub const fn advance(&mut self) -> Ticket {
        self.0 += 1;
        Ticket(self.0)
    }

    /// Whether `ticket` belongs to the current generation.
    #[must_use]
    pub const fn is_current(&self, ticket: Ticket) -> bool {
        self.0 == ticket.0
    }
}

/// Whether a finished load was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Applied {
    Current,
    /// A newer load (or a reset) happened since the ticket was issued.
    Stale,
}

/// An option that can be listed in a selector.
pub trait SelectorOption {
    type Id: Clone + PartialEq + std::fmt::Display;

    fn option_id(&self) -> &Self::Id;
    fn label(&self) -> &str;
}

impl SelectorOption for Category {
    type Id = CategoryId;

    fn option_id(&self) -> &CategoryId {
        &self.id
    }

    fn label(&self) -> &str {
        &self.title
    }
}

impl SelectorOption for Subcategory {
    type Id = SubcategoryId;

    fn option_id(&self) -> &SubcategoryId {
        &self.id
    }

    fn label(&self) -> &str {
        &self.title
    }
}

/// Load state of a selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorState<T> {
    Empty,
    Loading,
    Populated(Vec<T>),
}

/// A selector whose options come from the backend.
#[derive(Debug, Clone)]
pub struct Selector<T: SelectorOption> {
    state: SelectorState<T>,
    generation: Generation,
    selected: Option<T::Id>,
    error: Option<String>,
}

impl<T: SelectorOption> Default for Selector<T> {
    fn default() -> Self {
        Self {
            state: SelectorState::Empty,
            generation: Generation::default(),
            selected: None,
            error: None,
        }
    }
}

impl<T: SelectorOption> Selector<T> {
    /// Enter `Loading`, dropping options and selection.
    pub fn begin(&mut self) -> Ticket {
        self.state = SelectorState::Loading;
        self.selected = None;
        self.error = None;
        self.generation.advance()
    }

    /// Apply the outcome of the load started with `ticket`.
    pub fn finish(&mut self, ticket: Ticket, outcome: Result<Vec<T>, String>) -> Applied {
        if !self.generation.is_current(ticket) {
            return Applied::Stale;
        }

        match outcome {
            Ok(options) => self.state = SelectorState::Populated(options),
            Err(message) => {
                self.state = SelectorState::Empty;
                self.error = Some(message);
            }
        }
        Applied::Current
    }

    /// Return to `Empty` and invalidate any in-flight load.
    pub fn reset(&mut self) {
        self.state = SelectorState::Empty;
        self.selected = None;
        self.error = None;
        self.generation.advance();
    }

    /// Select one of the listed options, or clear the selection.
    ///
    /// Returns `false` (and leaves the selection unchanged) if `id` is not
    /// one of the current options.
    pub fn select(&mut self, id: Option<T::Id>) -> bool {
        match id {
            None => {
                self.selected = None;
                true
            }
            Some(id) if self.options().iter().any(|o| *o.option_id() == id) => {
                self.selected = Some(id);
                true
            }
            Some(_) => false,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &SelectorState<T> {
        &self.state
    }

    /// Listed options, empty unless populated.
    #[must_use]
    pub fn options(&self) -> &[T] {
        match &self.state {
            SelectorState::Populated(options) => options,
            SelectorState::Empty | SelectorState::Loading => &[],
        }
    }

    #[must_use]
    pub const fn selected(&self) -> Option<&T::Id> {
        self.selected.as_ref()
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.state, SelectorState::Loading)
    }

    #[must_use]
    pub const fn is_populated(&self) -> bool {
        matches!(self.state, SelectorState::Populated(_))
    }

    /// Message of the last failed load, if the selector is empty because of it.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
