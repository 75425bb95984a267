/// Integration tests for the reader
/// Exercises: Scanner → Tokens, Parser → Expr, and printed forms
use conslisp::{
    parse_all, parse_one, Error, ErrorStage, Expr, Parser, Position, Scanner, Token, TokenKind,
};

fn kinds(source: &str) -> Vec<TokenKind> {
    Scanner::new(source)
        .scan_tokens()
        .unwrap()
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

#[test]
fn test_reader_token_positions_across_lines() {
    let tokens = Scanner::new("(+\n1\n2)").scan_tokens().unwrap();

    let positions: Vec<(usize, usize)> = tokens
        .iter()
        .filter(|t| t.kind != TokenKind::Eof)
        .map(|t| (t.position.line, t.position.column))
        .collect();
    assert_eq!(positions, vec![(1, 1), (1, 2), (2, 1), (3, 1), (3, 2)]);

    let lexemes: Vec<&str> = tokens.iter().map(|t| t.lexeme.as_str()).collect();
    assert_eq!(lexemes, vec!["(", "+", "1", "2", ")", ""]);
}

#[test]
fn test_reader_token_kinds() {
    use TokenKind::*;

    assert_eq!(
        kinds(r#"(defun f (x) '(x "s" -2.5))"#),
        vec![
            LeftParen, Symbol, Symbol, LeftParen, Symbol, RightParen, Quote, LeftParen, Symbol,
            String, Number, RightParen, RightParen, Eof
        ]
    );
    // A lone minus is a symbol, a minus before a digit starts a number
    assert_eq!(kinds("- -1"), vec![Symbol, Number, Eof]);
}

#[test]
fn test_reader_scanner_is_pull_based() {
    let mut scanner = Scanner::new("a");
    assert_eq!(scanner.next_token().unwrap().kind, TokenKind::Symbol);
    assert_eq!(scanner.next_token().unwrap().kind, TokenKind::Eof);
    // Eof repeats once reached
    assert_eq!(scanner.next_token().unwrap().kind, TokenKind::Eof);
}

#[test]
fn test_reader_token_serializes() {
    let token = Token::new(TokenKind::Symbol, "add2", Position::new(3, 7));
    let json = serde_json::to_string(&token).unwrap();
    let back: Token = serde_json::from_str(&json).unwrap();
    assert_eq!(back, token);
}

#[test]
fn test_reader_lex_errors() {
    let err = Scanner::new("(print \"oops").scan_tokens().unwrap_err();
    assert_eq!(
        err,
        Error::UnterminatedString {
            position: Position::new(1, 8)
        }
    );
    assert_eq!(err.stage(), ErrorStage::Lex);
    assert_eq!(err.to_string(), "Unterminated string at line 1, column 8");

    let err = Scanner::new("(+ 1\n  #2)").scan_tokens().unwrap_err();
    assert_eq!(
        err,
        Error::UnexpectedCharacter {
            ch: '#',
            position: Position::new(2, 3)
        }
    );
}

#[test]
fn test_reader_round_trip_normalizes_whitespace() {
    let cases = [
        ("(1   2 3)", "(1 2 3)"),
        ("  foo  ", "foo"),
        ("(a\n\t(b   c)\r\n d)", "(a (b c) d)"),
        ("( defun  sq ( x ) ( * x x ) )", "(defun sq (x) (* x x))"),
        (r#"("two  spaces" 1.50)"#, r#"("two  spaces" 1.5)"#),
    ];

    for (source, expected) in cases {
        let expr = parse_one(source).unwrap();
        assert_eq!(expr.to_text(), expected, "source: {:?}", source);
    }

    // Dotted pairs print but have no reader syntax
    assert!(matches!(
        parse_one("'(1 . 2)"),
        Err(Error::UnexpectedCharacter { ch: '.', .. })
    ));
}

#[test]
fn test_reader_constants() {
    assert_eq!(parse_one("t").unwrap(), Expr::Boolean(true));
    assert_eq!(parse_one("nil").unwrap(), Expr::Nil);
    assert_eq!(parse_one("()").unwrap(), Expr::Nil);
    assert_eq!(parse_one("(t nil)").unwrap().to_text(), "(T NIL)");
}

#[test]
fn test_reader_quote_sugar_is_plain_list() {
    let sugared = parse_one("'(a b)").unwrap();
    let explicit = parse_one("(quote (a b))").unwrap();
    assert_eq!(sugared, explicit);
}

#[test]
fn test_reader_parse_errors() {
    let err = parse_one(")").unwrap_err();
    assert_eq!(err.stage(), ErrorStage::Parse);
    assert_eq!(err.position(), Some(Position::new(1, 1)));

    assert!(matches!(
        parse_one(""),
        Err(Error::UnexpectedEndOfInput { .. })
    ));
    assert!(matches!(
        parse_one("(a (b c)"),
        Err(Error::UnterminatedList { .. })
    ));
}

#[test]
fn test_reader_parse_one_reads_first_expression_only() {
    assert_eq!(parse_one("(a) (b)").unwrap().to_text(), "(a)");
}

#[test]
fn test_reader_parser_step_by_step() {
    let mut parser = Parser::new("1 (2) '3").unwrap();

    assert_eq!(parser.parse_expr().unwrap(), Expr::Number(1.0));
    assert_eq!(parser.parse_expr().unwrap().to_text(), "(2)");
    assert!(!parser.is_at_end());
    assert_eq!(parser.parse_expr().unwrap().to_text(), "(quote 3)");
    assert!(parser.is_at_end());
}

#[test]
fn test_reader_parse_all_program() {
    let program = r#"
        (defun sq (x) (* x x))
        (sq 4)
        "done"
    "#;
    let exprs = parse_all(program).unwrap();
    assert_eq!(exprs.len(), 3);
    assert_eq!(exprs[2], Expr::string("done"));
}
