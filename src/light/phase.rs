//! Traffic light phases.

crate::state_enum! {
    /// Signal shown by a traffic light. Lights start on red.
    #[derive(Default)]
    pub enum Phase {
        #[default]
        Red,
        Green,
    }
}

impl Phase {
    pub fn is_green(self) -> bool {
        matches!(self, Self::Green)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(crate::core::State::name(self))
    }
}
