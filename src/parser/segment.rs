/// Operators that split a line into segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Pipe,      // |
    Semicolon, // ;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// No operator left: one simple command.
    Simple(&'a str),
    Split {
        left: &'a str,
        op: Operator,
        right: &'a str,
    },
}

/// Splits `line` at the first `|` or `;`, whichever comes first.
///
/// Everything after that operator is kept unparsed in `right`, operators
/// of either kind included, so `a | b ; c` yields `a` and `b ; c`.
pub fn split_first(line: &str) -> Segment<'_> {
    for (pos, ch) in line.char_indices() {
        let op = match ch {
            '|' => Operator::Pipe,
            ';' => Operator::Semicolon,
            _ => continue,
        };
        return Segment::Split {
            left: &line[..pos],
            op,
            right: &line[pos + ch.len_utf8()..],
        };
    }
    Segment::Simple(line)
}
