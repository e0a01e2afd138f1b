//! Entity registry: identity for every simulation object.
//!
//! All objects created during a combat session (characters, equipment and
//! skill/item instances, modifiers, live triggered effects, and action casts)
//! draw their identity from a single monotonically increasing counter. Typed
//! handles wrap the raw number so a modifier id can never be passed where a
//! character id is expected.
//!
//! Ids are never reused within a session, which keeps combat log references
//! unambiguous even after the referenced object has been destroyed.

use core::fmt;

macro_rules! define_handle {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(pub u32);

        impl $name {
            /// Returns the raw registry number.
            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", $prefix, self.0)
            }
        }
    };
}

define_handle!(
    /// Handle to a combatant.
    CharacterId,
    "char"
);
define_handle!(
    /// Handle to an equipment, skill, or item instance.
    ThingId,
    "thing"
);
define_handle!(
    /// Handle to a live modifier (buff, debuff, or status).
    ModifierId,
    "mod"
);
define_handle!(
    /// Handle to a live triggered effect.
    EffectId,
    "fx"
);
define_handle!(
    /// Handle to one use of an action (all of its acts share the cast).
    CastId,
    "cast"
);

/// Issues unique, incrementing identities.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    next: u32,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    fn bump(&mut self) -> u32 {
        self.next += 1;
        self.next
    }

    pub fn character(&mut self) -> CharacterId {
        CharacterId(self.bump())
    }

    pub fn thing(&mut self) -> ThingId {
        ThingId(self.bump())
    }

    pub fn modifier(&mut self) -> ModifierId {
        ModifierId(self.bump())
    }

    pub fn effect(&mut self) -> EffectId {
        EffectId(self.bump())
    }

    pub fn cast(&mut self) -> CastId {
        CastId(self.bump())
    }

    /// Number of identities issued so far.
    pub fn issued(&self) -> u32 {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_across_kinds() {
        let mut registry = Registry::new();
        let c = registry.character();
        let t = registry.thing();
        let m = registry.modifier();
        let e = registry.effect();
        let k = registry.cast();

        let raws = [c.raw(), t.raw(), m.raw(), e.raw(), k.raw()];
        for (i, a) in raws.iter().enumerate() {
            for b in &raws[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(registry.issued(), 5);
    }

    #[test]
    fn handles_display_with_prefix() {
        assert_eq!(CharacterId(3).to_string(), "char#3");
        assert_eq!(ModifierId(12).to_string(), "mod#12");
    }
}
