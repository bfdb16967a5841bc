/// What a grammar production does with the tokens it consumes.
///
/// Every production parses its full token sequence whatever the mode, so a
/// skipped branch leaves the lexer exactly where an evaluated one would.
/// Only [`Mode::Evaluate`] performs lookups and side effects; the other
/// modes parse silently. The control modes are raised by `return`, `break`
/// and `continue` and travel outward until a function call or loop
/// consumes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Evaluate,
    Skip,
    Returning,
    Breaking,
    Continuing,
}

impl Mode {
    pub fn is_evaluating(self) -> bool {
        self == Mode::Evaluate
    }

    /// Fold the mode after one loop iteration, returning whether the loop
    /// goes on. `break` and `continue` are consumed here; `return` keeps
    /// propagating.
    pub fn end_iteration(&mut self) -> bool {
        match *self {
            Mode::Evaluate => true,
            Mode::Continuing => {
                *self = Mode::Evaluate;
                true
            }
            Mode::Breaking => {
                *self = Mode::Evaluate;
                false
            }
            Mode::Returning | Mode::Skip => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Mode;

    #[test]
    fn test_end_iteration_consumes_loop_signals() {
        let mut mode = Mode::Continuing;
        assert!(mode.end_iteration());
        assert_eq!(mode, Mode::Evaluate);

        let mut mode = Mode::Breaking;
        assert!(!mode.end_iteration());
        assert_eq!(mode, Mode::Evaluate);

        let mut mode = Mode::Returning;
        assert!(!mode.end_iteration());
        assert_eq!(mode, Mode::Returning);
    }
}
