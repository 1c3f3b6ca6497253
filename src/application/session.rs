//! Interactive guessing game over any line-based reader and writer.

use std::fmt::Display;
use std::io::{BufRead, Write};

use tracing::{debug, info, instrument};

use crate::application::describe::{self, Comparison};
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::{DecisionTree, TreeError, TreeNodeConvert};

const COMMANDS: &str =
    "Command (Q - quit, G - guess, D - definition, C - compare, P - print the tree)\n>>> ";

/// A game session owning the tree it plays on.
pub struct Session<R, W> {
    tree: DecisionTree,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(tree: DecisionTree, input: R, output: W) -> Self {
        Self {
            tree,
            input,
            output,
        }
    }

    pub fn tree(&self) -> &DecisionTree {
        &self.tree
    }

    pub fn into_tree(self) -> DecisionTree {
        self.tree
    }

    fn say(&mut self, text: impl Display) -> ApplicationResult<()> {
        write!(self.output, "{text}")
            .and_then(|_| self.output.flush())
            .map_err(|e| ApplicationError::io("write to terminal", e))
    }

    /// Prints `text` and reads one trimmed line; end of input is `Aborted`.
    fn ask(&mut self, text: impl Display) -> ApplicationResult<String> {
        self.say(text)?;
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(|e| ApplicationError::io("read from terminal", e))?;
        if read == 0 {
            return Err(ApplicationError::Aborted);
        }
        Ok(line.trim().to_string())
    }

    fn ask_yes_no(&mut self, question: impl Display) -> ApplicationResult<bool> {
        loop {
            let answer = self.ask(format_args!("{question} (yes/no)\n>>> "))?;
            match answer.chars().next().map(|c| c.to_ascii_lowercase()) {
                Some('y') => return Ok(true),
                Some('n') => return Ok(false),
                _ => self.say("yes/no expected, try again.\n")?,
            }
        }
    }

    /// Walks the questions down to a leaf and learns from a wrong guess.
    #[instrument(level = "debug", skip(self))]
    pub fn guess(&mut self) -> ApplicationResult<()> {
        self.tree.ensure_valid()?;
        let Some(mut idx) = self.tree.root() else {
            return Ok(());
        };

        loop {
            let node = self.tree.node(idx)?;
            let (Some(yes), Some(no)) = (node.left(), node.right()) else {
                break;
            };
            let question = node.to_string();
            idx = if self.ask_yes_no(format_args!("Is it {question}?"))? {
                yes
            } else {
                no
            };
        }

        let Some(known) = self.tree.node(idx)?.value().map(str::to_string) else {
            let answer = self.ask("I know nothing yet. What are you thinking of?\n>>> ")?;
            return self.learn(|tree| tree.set_value(idx, answer));
        };

        if self.ask_yes_no(format_args!("It must be {known}. Is it?"))? {
            return self.say("Yay!\n");
        }

        let answer = self.ask("What is it, then?\n>>> ")?;
        let question = self.ask(format_args!("What is {answer} that {known} is not?\nIt is "))?;
        info!(%answer, %question, "learning");
        self.learn(|tree| tree.split_leaf(idx, answer, question))
    }

    /// Applies an edit; values the tree refuses are reported, not fatal.
    fn learn(
        &mut self,
        edit: impl FnOnce(&mut DecisionTree) -> Result<(), TreeError>,
    ) -> ApplicationResult<()> {
        match edit(&mut self.tree) {
            Ok(()) => self.say("I will remember that.\n"),
            Err(TreeError::InvalidArgument(reason)) => {
                self.say(format_args!("Cannot learn that: {reason}\n"))
            }
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn define(&mut self, word: &str) -> ApplicationResult<()> {
        match describe::define(&self.tree, word) {
            Ok(phrases) if phrases.is_empty() => {
                self.say(format_args!("{word} is the only thing I know.\n"))
            }
            Ok(phrases) => self.say(format_args!("It {}.\n", phrases.join(", "))),
            Err(TreeError::NotFound(_)) => self.say("Word was not found!\n"),
            Err(TreeError::InvalidArgument(reason)) => {
                self.say(format_args!("Cannot look that up: {reason}\n"))
            }
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn compare(&mut self, first: &str, second: &str) -> ApplicationResult<()> {
        let comparison = match describe::compare(&self.tree, first, second) {
            Ok(comparison) => comparison,
            Err(TreeError::NotFound(_)) => return self.say("One of the words was not found.\n"),
            Err(TreeError::InvalidArgument(reason)) => {
                return self.say(format_args!("Cannot look that up: {reason}\n"))
            }
            Err(e) => return Err(e.into()),
        };

        match comparison {
            Comparison::Same => self.say("They are the same objects...\n"),
            Comparison::Different {
                common,
                first: first_phrases,
                second: second_phrases,
            } => {
                if common.is_empty() {
                    self.say("These objects have nothing in common, as\n")?;
                } else {
                    self.say(format_args!(
                        "These objects are similar to each other as they both can be described as \"{}\", while\n",
                        common.join(", ")
                    ))?;
                }
                self.say(format_args!(
                    "object {first} {}, and\nobject {second} {}.\n",
                    first_phrases.join(", "),
                    second_phrases.join(", ")
                ))
            }
        }
    }

    pub fn print(&mut self) -> ApplicationResult<()> {
        let rendered = self.tree.to_tree_string();
        self.say(format_args!("{rendered}"))
    }

    /// Runs the command loop until quit or end of input.
    ///
    /// Returns whether the user asked to save the tree.
    #[instrument(level = "debug", skip(self))]
    pub fn run(&mut self) -> ApplicationResult<bool> {
        loop {
            let command = match self.ask(COMMANDS) {
                Ok(line) => line,
                Err(ApplicationError::Aborted) => return Ok(false),
                Err(e) => return Err(e),
            };
            let command = command.chars().next().map(|c| c.to_ascii_uppercase());
            debug!(?command, "command");

            match command {
                Some('Q') => break,
                Some('G') => self.guess()?,
                Some('D') => {
                    let word = self.ask("Which word do you want me to give definition of?\n>>> ")?;
                    self.define(&word)?;
                }
                Some('C') => {
                    let first = self.ask("What do you want me to compare with something?\n>>> ")?;
                    let second =
                        self.ask(format_args!("What do you want me to compare {first} to?\n>>> "))?;
                    self.compare(&first, &second)?;
                }
                Some('P') => self.print()?,
                _ => self.say("Incorrect command, enter command from the list.\n")?,
            }
        }

        if !self.has_knowledge() {
            debug!("nothing learned, not offering to save");
            return Ok(false);
        }
        self.ask_yes_no("Save the tree to the file it was read from?")
    }

    /// False while the root is still waiting for its first answer.
    fn has_knowledge(&self) -> bool {
        self.tree
            .root()
            .and_then(|root| self.tree.get_node(root))
            .is_some_and(|node| node.value().is_some())
    }
}

