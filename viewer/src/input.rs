//! Line commands accepted on stdin.
//!
//! A pointer target is written as its propagation path, innermost selector
//! first, with `|` between selectors: `click #cycling .op | #cycling`.

use eniac_panel::surface::PointerEvent;

#[derive(Clone, Debug, PartialEq)]
pub enum Input {
    Pointer {
        event: PointerEvent,
        path: Vec<String>,
    },
    Angle(f32),
    Show(String),
    Lit,
    Help,
    Quit,
}

pub const HELP: &str = "\
click <path>     step a switch, frame a panel
rclick <path>    step a switch backwards
press <path>     push a button down
release <path>   let a button up
menu <path>      return to the full view
angle <degrees>  rotate the last moved switch without changing its value
show <selector>  print an element's visual state
lit              list lit indicators
quit";

pub fn parse(line: &str) -> Result<Option<Input>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    let input = match command {
        "click" => pointer(PointerEvent::Click { reverse: false }, rest)?,
        "rclick" => pointer(PointerEvent::Click { reverse: true }, rest)?,
        "press" => pointer(PointerEvent::Press, rest)?,
        "release" => pointer(PointerEvent::Release, rest)?,
        "menu" => pointer(PointerEvent::ContextMenu, rest)?,
        "angle" => Input::Angle(
            rest.parse()
                .map_err(|_| format!("`{}` is not an angle", rest))?,
        ),
        "show" if !rest.is_empty() => Input::Show(rest.to_string()),
        "show" => return Err("show needs a selector".into()),
        "lit" => Input::Lit,
        "help" | "?" => Input::Help,
        "quit" | "exit" => Input::Quit,
        other => return Err(format!("unknown command `{}`", other)),
    };

    Ok(Some(input))
}

fn pointer(event: PointerEvent, rest: &str) -> Result<Input, String> {
    let path: Vec<String> = rest
        .split('|')
        .map(str::trim)
        .filter(|selector| !selector.is_empty())
        .map(str::to_string)
        .collect();

    if path.is_empty() {
        return Err("expected at least one selector".into());
    }

    Ok(Input::Pointer { event, path })
}
