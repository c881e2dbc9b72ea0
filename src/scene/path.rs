//! Minimal SVG path-data handling: enough to find a path's top anchor and
//! translate it vertically.

use std::fmt::Write;

use glam::DVec2;

use crate::error::SeqViewError;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Command(char),
    Number(f64),
}

fn malformed(data: &str, reason: impl Into<String>) -> SeqViewError {
    SeqViewError::MalformedPath {
        data: data.to_owned(),
        reason: reason.into(),
    }
}

fn tokenize(data: &str) -> Result<Vec<Token>, SeqViewError> {
    let mut tokens = Vec::new();
    let mut chars = data.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        if c.is_whitespace() || c == ',' {
            let _ = chars.next();
        } else if "MmLlHhVvCcSsQqTtAaZz".contains(c) {
            tokens.push(Token::Command(c));
            let _ = chars.next();
        } else if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' {
            let mut end = start;
            let mut prev = ' ';
            while let Some(&(i, d)) = chars.peek() {
                let sign_ok = (d == '-' || d == '+')
                    && (i == start || prev == 'e' || prev == 'E');
                if d.is_ascii_digit() || d == '.' || d == 'e' || d == 'E' || sign_ok
                {
                    end = i + d.len_utf8();
                    prev = d;
                    let _ = chars.next();
                } else {
                    break;
                }
            }
            let text = &data[start..end];
            let value: f64 = text.parse().map_err(|_| {
                malformed(data, format!("invalid number '{text}'"))
            })?;
            if !value.is_finite() {
                return Err(malformed(data, format!("non-finite '{text}'")));
            }
            tokens.push(Token::Number(value));
        } else {
            return Err(malformed(data, format!("unexpected '{c}'")));
        }
    }
    Ok(tokens)
}

/// Argument count per command and which argument slots hold absolute y
/// values.
fn y_slots(command: char) -> (usize, &'static [usize]) {
    match command {
        'M' | 'L' | 'T' => (2, &[1]),
        'm' | 'l' | 't' => (2, &[]),
        'H' | 'h' => (1, &[]),
        'V' => (1, &[0]),
        'v' => (1, &[]),
        'C' => (6, &[1, 3, 5]),
        'c' => (6, &[]),
        'S' | 'Q' => (4, &[1, 3]),
        's' | 'q' => (4, &[]),
        'A' => (7, &[6]),
        'a' => (7, &[]),
        _ => (0, &[]),
    }
}

/// The y of the leading move-to, in the path's own units.
///
/// `Ok(None)` for empty path data.
pub(crate) fn first_y(data: &str) -> Result<Option<f64>, SeqViewError> {
    let tokens = tokenize(data)?;
    match tokens.as_slice() {
        [] => Ok(None),
        [Token::Command('M' | 'm'), Token::Number(_), Token::Number(y), ..] => {
            Ok(Some(*y))
        }
        _ => Err(malformed(data, "path must start with a move-to")),
    }
}

/// Translate the path so its leading move-to sits at `y`.
pub(crate) fn move_to_y(data: &str, y: f64) -> Result<String, SeqViewError> {
    let Some(current) = first_y(data)? else {
        return Err(malformed(data, "empty path has no position"));
    };
    let delta = y - current;
    let tokens = tokenize(data)?;

    let mut out = String::with_capacity(data.len());
    let mut command = ' ';
    let mut arg = 0usize;
    let mut first_pair = true;

    for token in tokens {
        if !out.is_empty() {
            out.push(' ');
        }
        match token {
            Token::Command(c) => {
                command = c;
                arg = 0;
                out.push(c);
            }
            Token::Number(v) => {
                let (arity, slots) = y_slots(command);
                let slot = if arity == 0 { 0 } else { arg % arity };
                // The first pair of a leading relative move-to is absolute.
                let shift = slots.contains(&slot)
                    || (first_pair && command == 'm' && slot == 1);
                let value = if shift { v + delta } else { v };
                let _ = write!(out, "{value}");
                arg += 1;
                if arity > 0 && arg % arity == 0 {
                    first_pair = false;
                }
            }
        }
    }
    Ok(out)
}

/// Multiply every coordinate by `factor`. Arc rotation and flag arguments
/// are left alone.
pub(crate) fn scale(data: &str, factor: f64) -> Result<String, SeqViewError> {
    let tokens = tokenize(data)?;
    let mut out = String::with_capacity(data.len());
    let mut command = ' ';
    let mut arg = 0usize;

    for token in tokens {
        if !out.is_empty() {
            out.push(' ');
        }
        match token {
            Token::Command(c) => {
                command = c;
                arg = 0;
                out.push(c);
            }
            Token::Number(v) => {
                let (arity, _) = y_slots(command);
                let slot = if arity == 0 { 0 } else { arg % arity };
                let is_arc_flag =
                    matches!(command, 'A' | 'a') && (2..=4).contains(&slot);
                let value = if is_arc_flag { v } else { v * factor };
                let _ = write!(out, "{value}");
                arg += 1;
            }
        }
    }
    Ok(out)
}

/// Absolute positions of every end and control point, for bounding boxes.
pub(crate) fn points(data: &str) -> Result<Vec<DVec2>, SeqViewError> {
    let tokens = tokenize(data)?;
    let mut points = Vec::new();
    let mut current = DVec2::ZERO;
    let mut start = DVec2::ZERO;
    let mut command = ' ';
    let mut args: Vec<f64> = Vec::with_capacity(7);

    for token in tokens {
        match token {
            Token::Command(c) => {
                command = c;
                args.clear();
                if matches!(c, 'Z' | 'z') {
                    current = start;
                }
            }
            Token::Number(v) => {
                args.push(v);
                let (arity, _) = y_slots(command);
                if arity == 0 || args.len() < arity {
                    continue;
                }
                let relative = command.is_ascii_lowercase();
                let base = if relative { current } else { DVec2::ZERO };
                let end = match command.to_ascii_uppercase() {
                    'H' => DVec2::new(base.x + args[0], current.y),
                    'V' => DVec2::new(current.x, base.y + args[0]),
                    'A' => base + DVec2::new(args[5], args[6]),
                    _ => {
                        // Control points first, the end point is pushed below.
                        for pair in args[..arity - 2].chunks_exact(2) {
                            points.push(base + DVec2::new(pair[0], pair[1]));
                        }
                        base + DVec2::new(args[arity - 2], args[arity - 1])
                    }
                };
                points.push(end);
                if matches!(command, 'M' | 'm') {
                    start = end;
                    // Further pairs after a move-to are implicit line-tos.
                    command = if command == 'M' { 'L' } else { 'l' };
                }
                current = end;
                args.clear();
            }
        }
    }
    Ok(points)
}
