//! legacy-config tool library
//!
//! Reads config entries from disk, dumps their definitions and writes
//! canonical re-encodings. The binary in `main.rs` is a thin clap layer
//! over these functions.

pub mod config;
pub mod dump;
pub mod input;
pub mod reencode;

use legacy_config::{DefinitionKind, Identikit, Item, Npc, Object, Sequence, Varp};

/// Definition kinds the tool can read, by archive entry name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Kind {
    /// Items
    Obj,
    /// NPCs
    Npc,
    /// Map objects
    Loc,
    /// Player variables
    Varp,
    /// Identikit body pieces
    Idk,
    /// Animation sequences
    Seq,
}

impl Kind {
    pub const ALL: [Kind; 6] = [
        Kind::Obj,
        Kind::Npc,
        Kind::Loc,
        Kind::Varp,
        Kind::Idk,
        Kind::Seq,
    ];

    /// Archive entry name (`obj`, `npc`, ...)
    pub fn entry_name(self) -> &'static str {
        match self {
            Kind::Obj => Item::ENTRY_NAME,
            Kind::Npc => Npc::ENTRY_NAME,
            Kind::Loc => Object::ENTRY_NAME,
            Kind::Varp => Varp::ENTRY_NAME,
            Kind::Idk => Identikit::ENTRY_NAME,
            Kind::Seq => Sequence::ENTRY_NAME,
        }
    }
}

/// Call `$f::<K>(args...)` with `K` the definition kind selected by `$kind`
#[macro_export]
macro_rules! with_kind {
    ($kind:expr, $f:ident ( $($arg:expr),* $(,)? )) => {
        match $kind {
            $crate::Kind::Obj => $f::<legacy_config::Item>($($arg),*),
            $crate::Kind::Npc => $f::<legacy_config::Npc>($($arg),*),
            $crate::Kind::Loc => $f::<legacy_config::Object>($($arg),*),
            $crate::Kind::Varp => $f::<legacy_config::Varp>($($arg),*),
            $crate::Kind::Idk => $f::<legacy_config::Identikit>($($arg),*),
            $crate::Kind::Seq => $f::<legacy_config::Sequence>($($arg),*),
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_names() {
        let names: Vec<_> = Kind::ALL.iter().map(|kind| kind.entry_name()).collect();
        assert_eq!(names, legacy_config::ENTRY_NAMES);
    }

    #[test]
    fn test_with_kind_dispatch() {
        fn name<K: DefinitionKind>() -> &'static str {
            K::ENTRY_NAME
        }
        for kind in Kind::ALL {
            assert_eq!(with_kind!(kind, name()), kind.entry_name());
        }
    }
}
