
//! The fixed infix operator table for the formula grammar.

use crate::expr::BinaryOp;

/// An infix operator has a spelling, a target [`BinaryOp`], a
/// precedence, and an associativity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InfixOperator {
  symbol: char,
  op: BinaryOp,
  assoc: Associativity,
  prec: Precedence,
}

/// The precedence of an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Precedence(u64);

/// The associativity of an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Associativity {
  left_assoc: bool,
  right_assoc: bool,
}

/// Every infix operator the grammar accepts. `^` binds tightest and
/// associates to the right; the four arithmetic operators associate
/// to the left, with `*` and `/` sharing a tier above `+` and `-`.
pub static INFIX_OPERATORS: [InfixOperator; 5] = [
  InfixOperator::new('^', BinaryOp::Pow, Associativity::RIGHT, Precedence::new(200)),
  InfixOperator::new('*', BinaryOp::Mul, Associativity::LEFT, Precedence::new(190)),
  InfixOperator::new('/', BinaryOp::Div, Associativity::LEFT, Precedence::new(190)),
  InfixOperator::new('+', BinaryOp::Add, Associativity::LEFT, Precedence::new(180)),
  InfixOperator::new('-', BinaryOp::Sub, Associativity::LEFT, Precedence::new(180)),
];

/// Looks up an infix operator by its spelling.
pub fn from_symbol(symbol: char) -> Option<&'static InfixOperator> {
  INFIX_OPERATORS.iter().find(|op| op.symbol == symbol)
}

/// Looks up the table entry for a [`BinaryOp`]. Every `BinaryOp` has
/// exactly one spelling, so this cannot fail.
pub fn properties(op: BinaryOp) -> &'static InfixOperator {
  INFIX_OPERATORS.iter().find(|entry| entry.op == op)
    .expect("every BinaryOp has an operator table entry")
}

impl InfixOperator {
  const fn new(symbol: char, op: BinaryOp, assoc: Associativity, prec: Precedence) -> Self {
    Self { symbol, op, assoc, prec }
  }

  pub fn symbol(&self) -> char {
    self.symbol
  }

  pub fn binary_op(&self) -> BinaryOp {
    self.op
  }

  pub fn precedence(&self) -> Precedence {
    self.prec
  }

  pub fn left_precedence(&self) -> Precedence {
    if self.assoc.is_left_assoc() {
      self.prec
    } else {
      self.prec.incremented()
    }
  }

  pub fn right_precedence(&self) -> Precedence {
    if self.assoc.is_right_assoc() {
      self.prec
    } else {
      self.prec.incremented()
    }
  }
}

impl Associativity {
  /// Indicates an operator which associates to the left.
  pub const LEFT: Associativity = Associativity {
    left_assoc: true,
    right_assoc: false,
  };
  /// Indicates an operator which associates to the right.
  pub const RIGHT: Associativity = Associativity {
    left_assoc: false,
    right_assoc: true,
  };
  pub const fn is_left_assoc(self) -> bool {
    self.left_assoc
  }
  pub const fn is_right_assoc(self) -> bool {
    self.right_assoc
  }
}

impl Precedence {
  pub const MIN: Precedence = Precedence(0);

  /// Internally, we store an operator's precedence as ten times the
  /// input value, so that we can increment to represent
  /// associativity.
  ///
  /// If `#` is a left-associative operator with internal precedence
  /// `p`, then its left-hand side is also at precedence `p`, while
  /// its right-hand side is at `p + 1`, indicating that another `#`
  /// does not extend the right-hand operand.
  pub const fn new(n: u64) -> Precedence {
    Precedence(n * 10)
  }

  pub const fn incremented(self) -> Precedence {
    Precedence(self.0 + 1)
  }
}
