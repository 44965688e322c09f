// engine/backtrack/compile.rs - Syntax tree to VM instructions.

use super::messages::TOO_BIG_PROGRAM;
use super::parse::{case_variants, fold, Assertion, Ast, Class, Node};
use crate::error::RegexError;

/// Instruction budget for one pattern. Counted repeats are unrolled, so
/// nested intervals can grow quickly.
pub const MAX_PROGRAM_SIZE: usize = 1 << 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inst {
    Char(char),
    /// Compares the folded input character against an already folded one.
    CharFold(char),
    Any,
    AnyNl,
    Class { class: Box<Class>, icase: bool },
    Assert(Assertion),
    Save(usize),
    /// Try the first target, fall back to the second.
    Split(usize, usize),
    Jmp(usize),
    EmptyCheckStart(usize),
    /// Leaves the loop through `exit` if the iteration consumed nothing.
    EmptyCheckEnd { reg: usize, exit: usize },
    BackRef { groups: Box<[usize]>, icase: bool },
    /// Runs the body at `pc + 1` up to `Succeed`; matching resumes at `end`.
    Look { negate: bool, end: usize },
    Atomic { end: usize },
    Succeed,
    Match,
}

pub struct Compiled {
    pub insts: Vec<Inst>,
    pub num_regs: usize,
}

struct Compiler<'p> {
    pattern: &'p str,
    insts: Vec<Inst>,
    num_regs: usize,
    ascii: bool,
}

pub fn compile(ast: &Ast, ascii: bool, pattern: &str) -> Result<Compiled, RegexError> {
    let mut c = Compiler {
        pattern,
        insts: Vec::new(),
        num_regs: 0,
        ascii,
    };
    c.emit(Inst::Save(0))?;
    c.node(&ast.node)?;
    c.emit(Inst::Save(1))?;
    c.emit(Inst::Match)?;
    Ok(Compiled {
        insts: c.insts,
        num_regs: c.num_regs,
    })
}

impl<'p> Compiler<'p> {
    fn emit(&mut self, inst: Inst) -> Result<usize, RegexError> {
        if self.insts.len() >= MAX_PROGRAM_SIZE {
            return Err(RegexError::syntax(self.pattern, TOO_BIG_PROGRAM));
        }
        self.insts.push(inst);
        Ok(self.insts.len() - 1)
    }

    fn pc(&self) -> usize {
        self.insts.len()
    }

    fn patch(&mut self, at: usize, inst: Inst) {
        self.insts[at] = inst;
    }

    fn new_reg(&mut self) -> usize {
        self.num_regs += 1;
        self.num_regs - 1
    }

    fn node(&mut self, node: &Node) -> Result<(), RegexError> {
        match node {
            Node::Empty => {}
            Node::Literal { ch, icase } => {
                if *icase && case_variants(*ch, self.ascii).len() > 1 {
                    self.emit(Inst::CharFold(fold(*ch, self.ascii)))?;
                } else {
                    self.emit(Inst::Char(*ch))?;
                }
            }
            Node::Any { dotall } => {
                self.emit(if *dotall { Inst::AnyNl } else { Inst::Any })?;
            }
            Node::Class { class, icase } => {
                self.emit(Inst::Class {
                    class: class.clone(),
                    icase: *icase,
                })?;
            }
            Node::Assert(a) => {
                self.emit(Inst::Assert(*a))?;
            }
            Node::Group { index, node } => {
                self.emit(Inst::Save(index * 2))?;
                self.node(node)?;
                self.emit(Inst::Save(index * 2 + 1))?;
            }
            Node::Concat(nodes) => {
                for n in nodes {
                    self.node(n)?;
                }
            }
            Node::Alternate(branches) => self.alternate(branches)?,
            Node::Repeat {
                node,
                min,
                max,
                greedy,
                possessive,
            } => {
                if *possessive {
                    let at = self.emit(Inst::Atomic { end: 0 })?;
                    self.repeat(node, *min, *max, true)?;
                    self.emit(Inst::Succeed)?;
                    let end = self.pc();
                    self.patch(at, Inst::Atomic { end });
                } else {
                    self.repeat(node, *min, *max, *greedy)?;
                }
            }
            Node::BackRef { groups, icase } => {
                self.emit(Inst::BackRef {
                    groups: groups.clone().into_boxed_slice(),
                    icase: *icase,
                })?;
            }
            Node::NamedBackRef { name, .. } => {
                // bound by the parser; reaching here means an unresolved name
                return Err(RegexError::syntax(
                    self.pattern,
                    super::messages::undefined_name_reference(name),
                ));
            }
            Node::Look { negate, node } => {
                let at = self.emit(Inst::Look {
                    negate: *negate,
                    end: 0,
                })?;
                self.node(node)?;
                self.emit(Inst::Succeed)?;
                let end = self.pc();
                self.patch(at, Inst::Look { negate: *negate, end });
            }
            Node::Atomic(node) => {
                let at = self.emit(Inst::Atomic { end: 0 })?;
                self.node(node)?;
                self.emit(Inst::Succeed)?;
                let end = self.pc();
                self.patch(at, Inst::Atomic { end });
            }
        }
        Ok(())
    }

    fn alternate(&mut self, branches: &[Node]) -> Result<(), RegexError> {
        let mut jumps = Vec::with_capacity(branches.len());
        for (i, branch) in branches.iter().enumerate() {
            if i + 1 == branches.len() {
                self.node(branch)?;
                break;
            }
            let split = self.emit(Inst::Split(0, 0))?;
            self.node(branch)?;
            jumps.push(self.emit(Inst::Jmp(0))?);
            let next = self.pc();
            self.patch(split, Inst::Split(split + 1, next));
        }
        let end = self.pc();
        for j in jumps {
            self.patch(j, Inst::Jmp(end));
        }
        Ok(())
    }

    fn repeat(
        &mut self,
        node: &Node,
        min: u32,
        max: Option<u32>,
        greedy: bool,
    ) -> Result<(), RegexError> {
        match max {
            None if min == 0 => self.star(node, greedy),
            None => {
                for _ in 1..min {
                    self.node(node)?;
                }
                self.plus(node, greedy)
            }
            Some(max) => {
                for _ in 0..min {
                    self.node(node)?;
                }
                let mut splits = Vec::new();
                for _ in min..max {
                    splits.push(self.emit(Inst::Split(0, 0))?);
                    self.node(node)?;
                }
                let end = self.pc();
                for s in splits {
                    self.patch(s, split(greedy, s + 1, end));
                }
                Ok(())
            }
        }
    }

    fn star(&mut self, node: &Node, greedy: bool) -> Result<(), RegexError> {
        let head = self.emit(Inst::Split(0, 0))?;
        let check = if can_be_empty(node) {
            let reg = self.new_reg();
            self.emit(Inst::EmptyCheckStart(reg))?;
            self.node(node)?;
            Some((reg, self.emit(Inst::EmptyCheckEnd { reg, exit: 0 })?))
        } else {
            self.node(node)?;
            None
        };
        self.emit(Inst::Jmp(head))?;
        let end = self.pc();
        self.patch(head, split(greedy, head + 1, end));
        if let Some((reg, at)) = check {
            self.patch(at, Inst::EmptyCheckEnd { reg, exit: end });
        }
        Ok(())
    }

    fn plus(&mut self, node: &Node, greedy: bool) -> Result<(), RegexError> {
        let body = self.pc();
        let check = if can_be_empty(node) {
            let reg = self.new_reg();
            self.emit(Inst::EmptyCheckStart(reg))?;
            self.node(node)?;
            Some((reg, self.emit(Inst::EmptyCheckEnd { reg, exit: 0 })?))
        } else {
            self.node(node)?;
            None
        };
        let tail = self.emit(Inst::Split(0, 0))?;
        let end = self.pc();
        self.patch(tail, split(greedy, body, end));
        if let Some((reg, at)) = check {
            self.patch(at, Inst::EmptyCheckEnd { reg, exit: end });
        }
        Ok(())
    }
}

fn split(greedy: bool, body: usize, skip: usize) -> Inst {
    if greedy {
        Inst::Split(body, skip)
    } else {
        Inst::Split(skip, body)
    }
}

/// Conservative: true whenever the node might match without consuming.
fn can_be_empty(node: &Node) -> bool {
    match node {
        Node::Literal { .. } | Node::Any { .. } | Node::Class { .. } => false,
        Node::Empty
        | Node::Assert(_)
        | Node::Look { .. }
        | Node::BackRef { .. }
        | Node::NamedBackRef { .. } => true,
        Node::Group { node, .. } | Node::Atomic(node) => can_be_empty(node),
        Node::Concat(nodes) => nodes.iter().all(can_be_empty),
        Node::Alternate(nodes) => nodes.iter().any(can_be_empty),
        Node::Repeat { node, min, .. } => *min == 0 || can_be_empty(node),
    }
}
