//! Printing and input words. All output goes through the interpreter's
//! [`crate::PrintWriter`].

use std::io::BufRead;

use crate::exception::{Failure, RunResult};
use crate::interp::Interpreter;
use crate::value::Value;

/// `(a -- )`
pub(crate) fn show(interp: &mut Interpreter) -> RunResult<()> {
    let value = interp.stack_mut().pop()?;
    let line = value.to_string();
    interp.writer_mut().write_line(&line);
    Ok(())
}

/// `(a -- a)`
pub(crate) fn peek(interp: &mut Interpreter) -> RunResult<()> {
    let value = interp.stack_mut().pop()?;
    let line = value.to_string();
    interp.writer_mut().write_line(&line);
    interp.stack_mut().push(value);
    Ok(())
}

/// `(a -- )`
pub(crate) fn show_repr(interp: &mut Interpreter) -> RunResult<()> {
    let value = interp.stack_mut().pop()?;
    let line = format!("{}: {value}", value.tag_name());
    interp.writer_mut().write_line(&line);
    Ok(())
}

/// `(a -- a)`
pub(crate) fn peek_repr(interp: &mut Interpreter) -> RunResult<()> {
    let value = interp.stack_mut().pop()?;
    let line = format!("{}: {value}", value.tag_name());
    interp.writer_mut().write_line(&line);
    interp.stack_mut().push(value);
    Ok(())
}

/// `(a -- s)` — shows the prompt, reads one line from stdin, and pushes it
/// without its trailing newline. End of input raises `EOFError`.
pub(crate) fn input(interp: &mut Interpreter) -> RunResult<()> {
    let prompt = interp.stack_mut().pop()?;
    let text = prompt.to_string();
    interp.writer_mut().write_text(&text);

    let mut line = String::new();
    let read = std::io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|err| Failure::user("EOFError", vec![Value::Str(err.to_string())]))?;
    if read == 0 {
        return Err(Failure::user("EOFError", vec![]));
    }
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    interp.stack_mut().push(Value::Str(line));
    Ok(())
}

/// `( -- )` — dumps the scope frames, innermost first. The builtin frame
/// is summarized rather than listed word by word.
pub(crate) fn show_scopes(interp: &mut Interpreter) -> RunResult<()> {
    let mut lines = vec!["Scopes".to_string()];
    let depth = interp.scopes().depth();
    for (index, frame) in interp.scopes().frames_inner_to_outer().enumerate() {
        if index + 1 == depth {
            lines.push(format!("  <builtins: {} words>", frame.len()));
            continue;
        }
        let mut entries: Vec<_> = frame.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        for (name, value) in entries {
            lines.push(format!("  {name} = {}", value.repr()));
        }
        lines.push(String::new());
    }
    for line in lines {
        interp.writer_mut().write_line(&line);
    }
    Ok(())
}
