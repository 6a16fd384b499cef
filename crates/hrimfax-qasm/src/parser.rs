//! Recursive-descent parser over the token stream.

use crate::ast::{QasmKernel, QasmProgram, QasmStatement, StatementGate};
use crate::error::{QasmError, QasmResult};
use crate::lexer::{tokenize, Token};
use tracing::debug;

/// Parse a qasm source string.
pub fn parse(src: &str) -> QasmResult<QasmProgram> {
    let tokens = tokenize(src)?;
    let mut p = Parser { tokens, pos: 0 };
    let program = p.program()?;
    debug!(
        qubits = program.qubits,
        kernels = program.kernels.len(),
        "qasm parsed"
    );
    Ok(program)
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn line(&self) -> usize {
        self.tokens
            .get(self.pos.min(self.tokens.len().saturating_sub(1)))
            .map(|(_, l)| *l)
            .unwrap_or(0)
    }

    fn next(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).map(|(t, _)| t.clone());
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn unexpected(&self, expected: &'static str) -> QasmError {
        match self.tokens.get(self.pos) {
            Some((tok, line)) => QasmError::Unexpected {
                line: *line,
                expected,
                found: format!("{tok:?}"),
            },
            None => QasmError::Eof(expected),
        }
    }

    fn skip_newlines(&mut self) {
        while matches!(self.peek(), Some(Token::Newline)) {
            self.pos += 1;
        }
    }

    fn expect_newline_or_eof(&mut self) -> QasmResult<()> {
        match self.peek() {
            Some(Token::Newline) => {
                self.pos += 1;
                Ok(())
            }
            None => Ok(()),
            Some(_) => Err(self.unexpected("end of line")),
        }
    }

    fn program(&mut self) -> QasmResult<QasmProgram> {
        self.skip_newlines();
        if !matches!(self.next(), Some(Token::Version)) {
            self.pos = self.pos.saturating_sub(1);
            return Err(self.unexpected("'version'"));
        }
        let version = match self.next() {
            Some(Token::Float(v)) if (v - 1.0).abs() < f64::EPSILON => "1.0".to_string(),
            Some(Token::Float(v)) => return Err(QasmError::Version(v.to_string())),
            Some(Token::Int(v)) => return Err(QasmError::Version(v.to_string())),
            _ => {
                self.pos = self.pos.saturating_sub(1);
                return Err(self.unexpected("version number"));
            }
        };
        self.expect_newline_or_eof()?;
        self.skip_newlines();

        if !matches!(self.next(), Some(Token::Qubits)) {
            self.pos = self.pos.saturating_sub(1);
            return Err(self.unexpected("'qubits'"));
        }
        let qubits = match self.next() {
            Some(Token::Int(n)) if n >= 0 => n as u32,
            _ => {
                self.pos = self.pos.saturating_sub(1);
                return Err(self.unexpected("qubit count"));
            }
        };
        self.expect_newline_or_eof()?;

        let mut kernels: Vec<QasmKernel> = Vec::new();
        loop {
            self.skip_newlines();
            match self.peek() {
                None => break,
                Some(Token::Section(_)) => {
                    let Some(Token::Section(name)) = self.next() else {
                        unreachable!()
                    };
                    self.expect_newline_or_eof()?;
                    kernels.push(QasmKernel {
                        name,
                        statements: Vec::new(),
                    });
                }
                Some(_) => {
                    let Some(kernel) = kernels.last_mut() else {
                        return Err(QasmError::NoSection(self.line()));
                    };
                    let stmt = statement(self)?;
                    kernel.statements.push(stmt);
                }
            }
        }

        Ok(QasmProgram {
            version,
            qubits,
            kernels,
        })
    }
}

fn statement(p: &mut Parser) -> QasmResult<QasmStatement> {
    match p.peek() {
        Some(Token::Wait) => {
            p.pos += 1;
            let cycles = match p.next() {
                Some(Token::Int(n)) if n >= 0 => n as u64,
                _ => {
                    p.pos = p.pos.saturating_sub(1);
                    return Err(p.unexpected("wait duration"));
                }
            };
            p.expect_newline_or_eof()?;
            Ok(QasmStatement::Wait(cycles))
        }
        Some(Token::LBrace) => {
            p.pos += 1;
            let mut gates = vec![gate(p)?];
            loop {
                match p.next() {
                    Some(Token::Pipe) => gates.push(gate(p)?),
                    Some(Token::RBrace) => break,
                    _ => {
                        p.pos = p.pos.saturating_sub(1);
                        return Err(p.unexpected("'|' or '}'"));
                    }
                }
            }
            p.expect_newline_or_eof()?;
            Ok(QasmStatement::Parallel(gates))
        }
        Some(Token::Ident(_)) => {
            let g = gate(p)?;
            p.expect_newline_or_eof()?;
            Ok(QasmStatement::Gate(g))
        }
        _ => Err(p.unexpected("a statement")),
    }
}

fn gate(p: &mut Parser) -> QasmResult<StatementGate> {
    let name = match p.next() {
        Some(Token::Ident(n)) => n,
        _ => {
            p.pos = p.pos.saturating_sub(1);
            return Err(p.unexpected("gate name"));
        }
    };
    let mut g = StatementGate {
        name,
        qubits: Vec::new(),
        cregs: Vec::new(),
        angle: None,
    };
    // Operand list runs to the end of the statement.
    loop {
        match p.peek() {
            Some(Token::QubitRef(q)) => {
                g.qubits.push(*q);
                p.pos += 1;
            }
            Some(Token::CregRef(c)) => {
                g.cregs.push(*c);
                p.pos += 1;
            }
            Some(Token::Float(a)) => {
                g.angle = Some(*a);
                p.pos += 1;
            }
            Some(Token::Int(a)) => {
                g.angle = Some(*a as f64);
                p.pos += 1;
            }
            _ => break,
        }
        if matches!(p.peek(), Some(Token::Comma)) {
            p.pos += 1;
        } else {
            break;
        }
    }
    Ok(g)
}
