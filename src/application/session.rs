//! Editing session: owns the current forest and replaces it wholesale after
//! every command.
//!
//! The `on_*` methods are the surface a rendering layer calls; presentation
//! state (expansion, selection) never reaches this type.

use tracing::{debug, info};

use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::domain::{
    self, export_text, import_text, DomainError, Forest, NewItemTemplate, NodeFields,
    ParentOption, ParentResolver, TokenSource, UuidTokens,
};

/// Edit intents understood by [`Session::dispatch`].
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Import {
        text: String,
    },
    Add {
        parent_id: String,
    },
    Update {
        id: String,
        fields: NodeFields,
        new_parent: Option<String>,
        old_parent: Option<String>,
    },
    Delete {
        id: String,
    },
}

/// What a dispatched command did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Replaced,
    Added(String),
    Updated,
    Deleted,
    /// Target id did not exist; the forest is unchanged.
    Unchanged,
}

pub struct Session<T: TokenSource = UuidTokens> {
    forest: Forest,
    template: NewItemTemplate,
    resolver: ParentResolver,
    tokens: T,
}

impl Default for Session<UuidTokens> {
    fn default() -> Self {
        Self::with_tokens(UuidTokens)
    }
}

impl Session<UuidTokens> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            forest: Forest::default(),
            template: settings.new_item.clone(),
            resolver: ParentResolver::new(&settings.root_label, &settings.label_separator),
            tokens: UuidTokens,
        }
    }
}

impl<T: TokenSource> Session<T> {
    pub fn with_tokens(tokens: T) -> Self {
        Self {
            forest: Forest::default(),
            template: NewItemTemplate::default(),
            resolver: ParentResolver::default(),
            tokens,
        }
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    /// Swap in a complete forest, e.g. one loaded from disk.
    pub fn replace(&mut self, forest: Forest) {
        self.forest = forest;
    }

    pub fn on_import(&mut self, text: &str) -> &Forest {
        let forest = import_text(text);
        info!("imported {} node(s) in {} root(s)", forest.len(), forest.roots.len());
        self.forest = forest;
        &self.forest
    }

    pub fn on_export(&self) -> String {
        export_text(&self.forest)
    }

    /// Add a placeholder child; returns the new id, `None` if the parent is unknown.
    pub fn on_add(&mut self, parent_id: &str) -> Option<String> {
        let (forest, id) = domain::add(&self.forest, parent_id, &self.template, &mut self.tokens);
        self.forest = forest;
        id
    }

    /// Apply an edit. A reparent target outside [`Session::parent_options`] is
    /// rejected before the engine runs; an unknown `id` is a no-op.
    pub fn on_update(
        &mut self,
        id: &str,
        fields: &NodeFields,
        new_parent: Option<&str>,
        old_parent: Option<&str>,
    ) -> ApplicationResult<bool> {
        if !self.forest.contains(id) {
            return Ok(false);
        }
        if new_parent != old_parent && !self.resolver.is_allowed(&self.forest, id, new_parent) {
            return Err(DomainError::IllegalParent {
                id: id.to_string(),
                parent: new_parent.unwrap_or_default().to_string(),
            }
            .into());
        }
        self.forest = domain::update(&self.forest, id, fields, new_parent, old_parent);
        Ok(true)
    }

    /// Cascading delete; returns whether anything was removed.
    pub fn on_delete(&mut self, id: &str) -> bool {
        let existed = self.forest.contains(id);
        self.forest = domain::delete(&self.forest, id);
        existed
    }

    pub fn parent_options(&self, id: &str) -> Vec<ParentOption> {
        self.resolver.options(&self.forest, id)
    }

    /// Reducer entry point.
    pub fn dispatch(&mut self, command: Command) -> ApplicationResult<Outcome> {
        debug!(?command, "dispatch");
        let outcome = match command {
            Command::Import { text } => {
                self.on_import(&text);
                Outcome::Replaced
            }
            Command::Add { parent_id } => match self.on_add(&parent_id) {
                Some(id) => Outcome::Added(id),
                None => Outcome::Unchanged,
            },
            Command::Update {
                id,
                fields,
                new_parent,
                old_parent,
            } => {
                if self.on_update(&id, &fields, new_parent.as_deref(), old_parent.as_deref())? {
                    Outcome::Updated
                } else {
                    Outcome::Unchanged
                }
            }
            Command::Delete { id } => {
                if self.on_delete(&id) {
                    Outcome::Deleted
                } else {
                    Outcome::Unchanged
                }
            }
        };
        Ok(outcome)
    }
}
