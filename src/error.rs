//! Error types for the conslisp reader and evaluator

use thiserror::Error;

use crate::lexer::Position;

/// Conslisp errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // Lex errors
    /// String literal with no closing quote
    ///
    /// **Triggered by:** End of input reached inside a `"..."` literal
    /// **Example:** `"hello` (position points at the opening quote)
    #[error("Unterminated string at {position}")]
    UnterminatedString {
        /// Position of the opening quote
        position: Position,
    },

    /// Character that cannot start any token
    ///
    /// **Example:** `(+ 1 @)`, `[1 2]`
    #[error("Unexpected character '{ch}' at {position}")]
    UnexpectedCharacter {
        /// The offending character
        ch: char,
        /// Where it was found
        position: Position,
    },

    // Parse errors
    /// `)` where an expression was expected
    #[error("Unexpected ')' at {position}")]
    UnexpectedCloseParen {
        /// Position of the stray paren
        position: Position,
    },

    /// Input ended where an expression was expected
    #[error("Unexpected end of input at {position}")]
    UnexpectedEndOfInput {
        /// Position of the end of input
        position: Position,
    },

    /// Input ended inside a list
    ///
    /// **Example:** `(+ 1 2`
    #[error("Unterminated list: expected ')' before end of input at {position}")]
    UnterminatedList {
        /// Position of the end of input
        position: Position,
    },

    /// Number token the float parser rejected
    #[error("Invalid number literal '{literal}' at {position}")]
    InvalidNumberLiteral {
        /// Raw token text
        literal: String,
        /// Position of the token
        position: Position,
    },

    // Runtime errors
    /// Reference to an unbound symbol
    ///
    /// **Triggered by:** Looking up a name that no environment in the chain binds
    /// **Example:** `(+ x 1)` when `x` was never bound
    #[error("Undefined variable: {name}")]
    UndefinedVariable {
        /// Symbol name
        name: String,
    },

    /// Operand of the wrong type
    ///
    /// **Example:** `(+ 1 "two")`
    #[error("Type error in {function}: expected {expected}, got {got}")]
    TypeMismatch {
        /// Procedure that rejected the operand
        function: String,
        /// Expected type
        expected: String,
        /// Actual type
        got: String,
    },

    /// Wrong number of arguments
    ///
    /// **Example:** `((lambda (x) x) 1 2)`, `(-)`
    #[error("Arity mismatch in {function}: expected {expected} argument(s), got {got}")]
    ArityMismatch {
        /// Procedure name (`lambda` for anonymous closures)
        function: String,
        /// Expected count, e.g. `2` or `at least 1`
        expected: String,
        /// Actual count
        got: usize,
    },

    /// Application of a value that is neither a builtin nor a closure
    ///
    /// **Example:** `(1 2 3)`
    #[error("Value is not callable: {value}")]
    NotCallable {
        /// Rendering of the value in head position
        value: String,
    },

    /// Division by zero
    ///
    /// **Example:** `(/ 10 0)`, `(/ 0)`
    #[error("Division by zero")]
    DivisionByZero,

    /// Special form with the wrong shape
    ///
    /// **Example:** `(quote)`, `(if t)`, `(lambda (1) x)`, `(defun "f" () 1)`
    #[error("Malformed special form {form}: {reason}")]
    MalformedSpecialForm {
        /// `quote`, `if`, `lambda` or `defun`
        form: String,
        /// What was wrong with it
        reason: String,
    },
}

/// Pipeline stage an error belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorStage {
    /// Tokenization
    Lex,
    /// Tree building
    Parse,
    /// Evaluation and application
    Eval,
}

impl Error {
    /// Create a malformed special form error
    pub fn malformed(form: &str, reason: impl Into<String>) -> Self {
        Error::MalformedSpecialForm {
            form: form.to_string(),
            reason: reason.into(),
        }
    }

    /// Classify the stage that raised the error
    pub fn stage(&self) -> ErrorStage {
        match self {
            Error::UnterminatedString { .. } | Error::UnexpectedCharacter { .. } => ErrorStage::Lex,

            Error::UnexpectedCloseParen { .. }
            | Error::UnexpectedEndOfInput { .. }
            | Error::UnterminatedList { .. }
            | Error::InvalidNumberLiteral { .. } => ErrorStage::Parse,

            Error::UndefinedVariable { .. }
            | Error::TypeMismatch { .. }
            | Error::ArityMismatch { .. }
            | Error::NotCallable { .. }
            | Error::DivisionByZero
            | Error::MalformedSpecialForm { .. } => ErrorStage::Eval,
        }
    }

    /// Source position for reader errors
    pub fn position(&self) -> Option<Position> {
        match self {
            Error::UnterminatedString { position }
            | Error::UnexpectedCharacter { position, .. }
            | Error::UnexpectedCloseParen { position }
            | Error::UnexpectedEndOfInput { position }
            | Error::UnterminatedList { position }
            | Error::InvalidNumberLiteral { position, .. } => Some(*position),
            _ => None,
        }
    }
}

/// Result type for conslisp operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_classification() {
        let pos = Position::new(1, 1);
        assert_eq!(
            Error::UnexpectedCharacter { ch: '@', position: pos }.stage(),
            ErrorStage::Lex
        );
        assert_eq!(Error::UnterminatedList { position: pos }.stage(), ErrorStage::Parse);
        assert_eq!(Error::DivisionByZero.stage(), ErrorStage::Eval);
        assert_eq!(Error::malformed("quote", "x").stage(), ErrorStage::Eval);
    }

    #[test]
    fn test_messages_carry_position() {
        let err = Error::UnterminatedString {
            position: Position::new(2, 5),
        };
        assert_eq!(err.to_string(), "Unterminated string at line 2, column 5");
        assert_eq!(err.position(), Some(Position::new(2, 5)));
        assert_eq!(Error::DivisionByZero.position(), None);
    }
}
