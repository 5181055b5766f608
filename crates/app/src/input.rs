use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// A line typed at the terminal, already classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// `l <n>`: pick the n-th entry of the left column (1-based).
    Left(usize),
    /// `r <n>`: pick the n-th entry of the right column (1-based).
    Right(usize),
    /// A bare number, used to pick a quiz option.
    Choice(usize),
    Next,
    Restart,
    Help,
    Quit,
    Unknown,
}

impl Input {
    pub fn parse(line: &str) -> Self {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Input::Unknown;
        };
        let arg = words.next();
        if words.next().is_some() {
            return Input::Unknown;
        }

        match (head.to_ascii_lowercase().as_str(), arg) {
            ("l" | "left", Some(n)) => position(n).map_or(Input::Unknown, Input::Left),
            ("r" | "right", Some(n)) => position(n).map_or(Input::Unknown, Input::Right),
            ("n" | "next", None) => Input::Next,
            ("restart" | "retry", None) => Input::Restart,
            ("h" | "help" | "?", None) => Input::Help,
            ("q" | "quit" | "exit", None) => Input::Quit,
            (n, None) => position(n).map_or(Input::Unknown, Input::Choice),
            _ => Input::Unknown,
        }
    }
}

fn position(raw: &str) -> Option<usize> {
    raw.parse::<usize>().ok().filter(|n| *n > 0)
}

pub struct Terminal {
    lines: Lines<BufReader<Stdin>>,
}

impl Terminal {
    pub fn stdin() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Next input line; end of input reads as `Quit`.
    pub async fn read(&mut self) -> std::io::Result<Input> {
        Ok(match self.lines.next_line().await? {
            Some(line) => Input::parse(&line),
            None => Input::Quit,
        })
    }
}
