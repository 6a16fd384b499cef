//! Token definitions for the qasm dialect.

use crate::error::{QasmError, QasmResult};
use logos::Logos;

/// One lexical token.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r]+")]
#[logos(skip r"#[^\n]*")]
pub enum Token {
    #[token("version")]
    Version,

    #[token("qubits")]
    Qubits,

    #[token("wait")]
    Wait,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("|")]
    Pipe,

    #[token(",")]
    Comma,

    #[token("\n")]
    Newline,

    /// Kernel section label, `.name`.
    #[regex(r"\.[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice()[1..].to_string())]
    Section(String),

    /// Qubit operand, `q[N]`.
    #[regex(r"q\[[0-9]+\]", |lex| {
        let s = lex.slice();
        s[2..s.len() - 1].parse().ok()
    })]
    QubitRef(u32),

    /// Classical register operand, `rN`.
    #[regex(r"r[0-9]+", |lex| lex.slice()[1..].parse().ok())]
    CregRef(u32),

    /// Floating-point literal (angles, the version number).
    #[regex(r"-?[0-9]+\.[0-9]+([eE][-+]?[0-9]+)?", |lex| lex.slice().parse().ok())]
    Float(f64),

    /// Integer literal.
    #[regex(r"-?[0-9]+", |lex| lex.slice().parse().ok())]
    Int(i64),

    /// Gate or other name.
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),
}

/// Tokenize a source string, pairing each token with its 1-based line.
pub fn tokenize(src: &str) -> QasmResult<Vec<(Token, usize)>> {
    let mut out = Vec::new();
    let mut line = 1;
    for (result, span) in Token::lexer(src).spanned() {
        match result {
            Ok(tok) => {
                let is_newline = tok == Token::Newline;
                out.push((tok, line));
                if is_newline {
                    line += 1;
                }
            }
            Err(()) => {
                return Err(QasmError::Lex {
                    line,
                    text: src[span].to_string(),
                });
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_line() {
        let toks: Vec<Token> = tokenize("cnot q[0],q[1]\n")
            .unwrap()
            .into_iter()
            .map(|(t, _)| t)
            .collect();
        assert_eq!(
            toks,
            vec![
                Token::Ident("cnot".into()),
                Token::QubitRef(0),
                Token::Comma,
                Token::QubitRef(1),
                Token::Newline,
            ]
        );
    }

    #[test]
    fn test_comment_skipped() {
        let toks = tokenize("# a comment\nqubits 5\n").unwrap();
        assert_eq!(toks[0].0, Token::Newline);
        assert_eq!(toks[1], (Token::Qubits, 2));
        assert_eq!(toks[2], (Token::Int(5), 2));
    }

    #[test]
    fn test_section_and_creg() {
        let toks: Vec<Token> = tokenize(".init\nmeasure q[2],r0\n")
            .unwrap()
            .into_iter()
            .map(|(t, _)| t)
            .collect();
        assert_eq!(toks[0], Token::Section("init".into()));
        assert!(toks.contains(&Token::CregRef(0)));
    }

    #[test]
    fn test_bad_input() {
        let err = tokenize("x q[0] @\n").unwrap_err();
        assert!(matches!(err, QasmError::Lex { line: 1, .. }));
    }
}
