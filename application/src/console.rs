//! [`Console`] definitions.

use std::{fmt::Write as _, io};

use itertools::Itertools as _;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt as _, AsyncWrite, AsyncWriteExt as _,
    BufReader, Lines, Stdin, Stdout,
};

/// Line-oriented interactive console.
#[derive(Debug)]
pub struct Console<R = BufReader<Stdin>, W = Stdout> {
    /// Lines entered by a user.
    input: Lines<R>,

    /// Output shown to a user.
    output: W,
}

impl Console {
    /// Creates a new [`Console`] over the standard input and output.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Creates a new [`Console`] over the provided `input` and `output`.
    #[must_use]
    pub fn new(input: R, output: W) -> Self {
        Self {
            input: input.lines(),
            output,
        }
    }

    /// Returns the output of this [`Console`].
    #[must_use]
    pub fn output(&self) -> &W {
        &self.output
    }

    /// Prints the provided `text` as it is.
    ///
    /// # Errors
    ///
    /// If failed to write the output.
    pub async fn print(&mut self, text: &str) -> io::Result<()> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.flush().await
    }

    /// Prints the provided `text` followed by a new line.
    ///
    /// # Errors
    ///
    /// If failed to write the output.
    pub async fn println(&mut self, text: &str) -> io::Result<()> {
        self.print(&format!("{text}\n")).await
    }

    /// Prints the provided `text` and reads the trimmed line entered in
    /// response.
    ///
    /// Returns [`None`] once the input is exhausted.
    ///
    /// # Errors
    ///
    /// If failed to write the output or to read the input.
    pub async fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        self.print(text).await?;
        Ok(self
            .input
            .next_line()
            .await?
            .map(|line| line.trim().to_owned()))
    }

    /// Asks the provided yes/no `question` until it's answered.
    ///
    /// An exhausted input is treated as "no".
    ///
    /// # Errors
    ///
    /// If failed to write the output or to read the input.
    pub async fn confirm(&mut self, question: &str) -> io::Result<bool> {
        loop {
            let Some(answer) =
                self.prompt(&format!("{question} (yes/no): ")).await?
            else {
                return Ok(false);
            };
            match answer.to_lowercase().as_str() {
                "yes" | "y" => return Ok(true),
                "no" | "n" => return Ok(false),
                _ => self.println("Please answer 'yes' or 'no'.").await?,
            }
        }
    }
}

/// Renders the provided `rows` as a table with the `headers`.
///
/// Every column is as wide as its widest cell.
#[must_use]
pub fn table<H, C>(headers: &[H], rows: &[Vec<C>]) -> String
where
    H: AsRef<str>,
    C: AsRef<str>,
{
    let widths = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .filter_map(|r| r.get(i))
                .map(|c| c.as_ref().chars().count())
                .chain([h.as_ref().chars().count()])
                .max()
                .unwrap_or_default()
        })
        .collect::<Vec<_>>();

    let mut out = String::new();
    _ = writeln!(out, "{}", line(headers.iter().map(AsRef::as_ref), &widths));
    _ = writeln!(
        out,
        "{}",
        widths.iter().map(|w| "-".repeat(*w)).join("-+-"),
    );
    for row in rows {
        _ = writeln!(out, "{}", line(row.iter().map(AsRef::as_ref), &widths));
    }
    out
}

/// Renders the provided `cells` of a table row padded to the `widths`.
fn line<'c>(cells: impl Iterator<Item = &'c str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(c, w)| format!("{c:<w$}"))
        .join(" | ")
        .trim_end()
        .to_owned()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{table, Console};

    #[tokio::test]
    async fn prompts_for_trimmed_line() {
        let mut console = Console::new(&b"  42 \nrest\n"[..], vec![]);

        let answer = console.prompt("Enter ID: ").await.unwrap();

        assert_eq!(answer.as_deref(), Some("42"));
        assert_eq!(console.output(), b"Enter ID: ");
    }

    #[tokio::test]
    async fn repeats_question_until_answered() {
        let mut console = Console::new(&b"maybe\nYes\n"[..], vec![]);

        assert!(console.confirm("Delete?").await.unwrap());
        assert_eq!(
            String::from_utf8_lossy(console.output()),
            "Delete? (yes/no): Please answer 'yes' or 'no'.\n\
             Delete? (yes/no): ",
        );
    }

    #[tokio::test]
    async fn treats_exhausted_input_as_refusal() {
        let mut console = Console::new(&b""[..], vec![]);

        assert!(!console.confirm("Delete?").await.unwrap());
    }

    #[test]
    fn aligns_table_columns() {
        let rendered = table(
            &["ID", "City"],
            &[vec!["1", "Springfield"], vec!["12", "Rome"]],
        );

        assert_eq!(
            rendered,
            "ID | City\n\
             ---+------------\n\
             1  | Springfield\n\
             12 | Rome\n",
        );
    }
}
