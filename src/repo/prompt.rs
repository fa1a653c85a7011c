use std::io::{self, BufRead, Write};

/// Interactive question/answer channel used by the repository resolver.
pub trait Prompter {
    /// Ask for a line of free text. `None` means the input is exhausted.
    fn input(&mut self, message: &str) -> io::Result<Option<String>>;

    /// Yes/no question; a blank answer takes `default`.
    fn confirm(&mut self, message: &str, default: bool) -> io::Result<bool>;

    /// Pick one of `options`, returning its index. A blank answer takes `default`.
    fn select(&mut self, message: &str, options: &[&str], default: usize) -> io::Result<usize>;

    /// Pick any subset of `items`, all pre-selected. Returns indices in list order.
    fn multi_select(&mut self, message: &str, items: &[String]) -> io::Result<Vec<usize>>;

    /// Show an informational line.
    fn notice(&mut self, message: &str) -> io::Result<()>;
}

/// Line-oriented prompter over any reader/writer pair (stdin/stdout in the binary).
pub struct LinePrompter<R, W> {
    reader: R,
    writer: W,
}

impl LinePrompter<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    fn ask(&mut self, message: &str) -> io::Result<Option<String>> {
        write!(self.writer, "{} ", message)?;
        self.writer.flush()?;
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            writeln!(self.writer)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    #[cfg(test)]
    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn input(&mut self, message: &str) -> io::Result<Option<String>> {
        self.ask(message)
    }

    fn confirm(&mut self, message: &str, default: bool) -> io::Result<bool> {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        loop {
            let Some(answer) = self.ask(&format!("{} {}", message, hint))? else {
                return Ok(default);
            };
            match answer.to_ascii_lowercase().as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => writeln!(self.writer, "Please answer y or n.")?,
            }
        }
    }

    fn select(&mut self, message: &str, options: &[&str], default: usize) -> io::Result<usize> {
        writeln!(self.writer, "{}", message)?;
        for (i, option) in options.iter().enumerate() {
            let marker = if i == default { ">" } else { " " };
            writeln!(self.writer, "{} {}) {}", marker, i + 1, option)?;
        }
        loop {
            let Some(answer) = self.ask(&format!("Choice [{}]:", default + 1))? else {
                return Ok(default);
            };
            if answer.is_empty() {
                return Ok(default);
            }
            match answer.parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => return Ok(n - 1),
                _ => writeln!(self.writer, "Enter a number between 1 and {}.", options.len())?,
            }
        }
    }

    fn multi_select(&mut self, message: &str, items: &[String]) -> io::Result<Vec<usize>> {
        writeln!(self.writer, "{}", message)?;
        for (i, item) in items.iter().enumerate() {
            writeln!(self.writer, "  [x] {}) {}", i + 1, item)?;
        }
        loop {
            let Some(answer) = self.ask("Numbers to keep (e.g. 1,3), blank keeps all:")? else {
                return Ok((0..items.len()).collect());
            };
            if answer.is_empty() {
                return Ok((0..items.len()).collect());
            }
            match parse_indices(&answer, items.len()) {
                Some(indices) => return Ok(indices),
                None => writeln!(self.writer, "Enter numbers between 1 and {}.", items.len())?,
            }
        }
    }

    fn notice(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.writer, "{}", message)
    }
}

/// Parse a comma/space separated list of 1-based positions into sorted, unique indices.
fn parse_indices(answer: &str, len: usize) -> Option<Vec<usize>> {
    let mut picked = vec![false; len];
    for token in answer.split(|c: char| c == ',' || c.is_whitespace()) {
        if token.is_empty() {
            continue;
        }
        let n: usize = token.parse().ok()?;
        if n == 0 || n > len {
            return None;
        }
        picked[n - 1] = true;
    }
    let indices: Vec<usize> = (0..len).filter(|&i| picked[i]).collect();
    if indices.is_empty() {
        None
    } else {
        Some(indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> LinePrompter<Cursor<Vec<u8>>, Vec<u8>> {
        LinePrompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_parse_indices() {
        assert_eq!(parse_indices("1,3", 3), Some(vec![0, 2]));
        assert_eq!(parse_indices("3 1 1", 3), Some(vec![0, 2]));
        assert_eq!(parse_indices("0", 3), None);
        assert_eq!(parse_indices("4", 3), None);
        assert_eq!(parse_indices("x", 3), None);
        assert_eq!(parse_indices(",", 3), None);
    }

    #[test]
    fn test_multi_select_blank_keeps_all() {
        let mut p = prompter("\n");
        let items = vec!["a/one".to_string(), "b/two".to_string()];
        assert_eq!(p.multi_select("Pick", &items).unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_multi_select_retries_on_bad_input() {
        let mut p = prompter("9\n2\n");
        let items = vec!["a/one".to_string(), "b/two".to_string()];
        assert_eq!(p.multi_select("Pick", &items).unwrap(), vec![1]);
        let out = String::from_utf8(p.into_writer()).unwrap();
        assert!(out.contains("Enter numbers between 1 and 2."));
    }

    #[test]
    fn test_select_default_and_explicit() {
        let mut p = prompter("\n3\n");
        let options = ["a", "b", "c"];
        assert_eq!(p.select("Mode", &options, 0).unwrap(), 0);
        assert_eq!(p.select("Mode", &options, 0).unwrap(), 2);
    }

    #[test]
    fn test_confirm_answers() {
        let mut p = prompter("y\nmaybe\nno\n");
        assert!(p.confirm("More?", false).unwrap());
        assert!(!p.confirm("More?", true).unwrap());
        assert!(p.confirm("More?", true).unwrap()); // EOF falls back to default
    }

    #[test]
    fn test_input_eof_is_none() {
        let mut p = prompter("");
        assert_eq!(p.input("Repo:").unwrap(), None);
    }
}
