use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use tracing::warn;

use crate::map::Direction;

/// A walk read from a script: whitespace-separated direction tokens, one
/// or more per line. Blank lines and `#` comments are skipped.
pub struct ScriptedInput {
    script_commands: Vec<Direction>,
    current_command_index: usize,
}

impl ScriptedInput {
    pub fn from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: BufRead>(reader: R) -> io::Result<Self> {
        let mut script_commands = Vec::new();

        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed_line = line.trim();
            if trimmed_line.is_empty() || trimmed_line.starts_with('#') {
                continue;
            }

            for token in trimmed_line.split_whitespace() {
                match token.parse::<Direction>() {
                    Ok(direction) => script_commands.push(direction),
                    Err(err) => warn!(line = line_no + 1, %err, "skipping token in script"),
                }
            }
        }

        Ok(Self {
            script_commands,
            current_command_index: 0,
        })
    }

    pub fn next_direction(&mut self) -> Option<Direction> {
        let direction = self.script_commands.get(self.current_command_index).copied();
        if direction.is_some() {
            self.current_command_index += 1;
        }
        direction
    }

    pub fn remaining(&self) -> usize {
        self.script_commands.len() - self.current_command_index
    }
}

impl Iterator for ScriptedInput {
    type Item = Direction;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_direction()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_tokens_and_skips_comments() {
        let script = "# a short walk\nne dn\n\n  up   sw\nbogus ee\n";
        let mut input = ScriptedInput::from_reader(script.as_bytes()).unwrap();
        assert_eq!(input.remaining(), 5);
        assert_eq!(input.next_direction(), Some(Direction::NE));
        let rest: Vec<Direction> = input.collect();
        assert_eq!(
            rest,
            vec![Direction::DN, Direction::UP, Direction::SW, Direction::EE]
        );
    }

    #[test]
    fn reads_from_a_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "NE").unwrap();
        writeln!(file, "# done").unwrap();
        let mut input = ScriptedInput::from_file(file.path()).unwrap();
        assert_eq!(input.next_direction(), Some(Direction::NE));
        assert_eq!(input.next_direction(), None);
        assert_eq!(input.remaining(), 0);
    }
}
