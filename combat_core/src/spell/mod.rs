//! Spells - Definitions, resolution and the per-actor spellbook

mod resolved;
mod spellbook;
mod table;

pub use resolved::{ResolvedSpell, SpellResolver};
pub use spellbook::{KnownSpell, SpellBook, SpellEntry, Spellbook};
pub use table::{SpellDefinition, SpellTable};
