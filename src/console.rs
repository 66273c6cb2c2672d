//! Interactive menus and table rendering.
//!
//! Menus own nothing but their stores and a line based reader/writer pair, so the
//! whole loop can be driven from a script in tests.

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::thread;
use std::time::Duration;

use log::{error, info};

use crate::engine::RecordStore;
use crate::input::InputCollector;
use crate::models::{Player, Team};
use crate::schema::{FieldDescriptor, Record};
use crate::{Error, RecordService, Result};

pub const DEFAULT_TABLE_WIDTH: usize = 77;

/// Presentation settings.
#[derive(Debug, Clone)]
pub struct MenuOptions {
    /// How long feedback messages stay before the menu is redrawn.
    pub pause: Duration,
    pub table_width: usize,
}

impl Default for MenuOptions {
    fn default() -> Self {
        Self {
            pause: Duration::from_millis(1000),
            table_width: DEFAULT_TABLE_WIDTH,
        }
    }
}

/// Fixed width text table.
pub struct ConsoleTable {
    width: usize,
}

impl ConsoleTable {
    pub fn new(width: usize) -> Self {
        Self { width }
    }

    pub fn line(&self) -> String {
        format!(" {}", "-".repeat(self.width))
    }

    pub fn row(&self, columns: &[String]) -> String {
        if columns.is_empty() {
            return "|".to_string();
        }
        let width = self.width.saturating_sub(columns.len()) / columns.len();
        let mut row = String::from("|");
        for (i, column) in columns.iter().enumerate() {
            let text = if i == 0 {
                format!(" {}", column)
            } else {
                column.clone()
            };
            row.push_str(&align_center(&text, width));
            row.push('|');
        }
        row
    }
}

fn align_center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    let text = if len > width {
        let keep = width.saturating_sub(3);
        format!("{}...", text.chars().take(keep).collect::<String>())
    } else {
        text.to_string()
    };

    let len = text.chars().count();
    if len == 0 || len >= width {
        return format!("{:<width$}", text, width = width);
    }
    let right = width - (width - len) / 2;
    format!("{:>width$}", format!("{:<right$}", text, right = right), width = width)
}

/// Descriptors shown as table columns: everything prompted for, plus the key.
pub fn table_columns<T: Record>() -> Vec<&'static FieldDescriptor> {
    T::fields().iter().filter(|f| !f.ignore || f.is_key).collect()
}

enum Flow {
    Continue,
    Exit,
}

/// The interactive roster manager.
pub struct RosterApp<R, W> {
    io: InputCollector<R, W>,
    teams: RecordStore<Team>,
    players: RecordStore<Player>,
    options: MenuOptions,
}

impl<R: BufRead, W: Write> RosterApp<R, W> {
    /// Opens the team and player stores in `data_dir`, which must exist.
    pub fn open<P: AsRef<Path>>(data_dir: P, reader: R, writer: W, options: MenuOptions) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        Ok(Self {
            io: InputCollector::new(reader, writer),
            teams: RecordStore::new(data_dir)?,
            players: RecordStore::new(data_dir)?,
            options,
        })
    }

    pub fn into_inner(self) -> (R, W) {
        self.io.into_inner()
    }

    /// Runs the main menu until the user exits or input closes.
    ///
    /// Errors from a sub-menu are reported and the main menu is shown again.
    pub fn run(&mut self) -> Result<()> {
        loop {
            match self.main_menu() {
                Ok(Flow::Exit) => break,
                Ok(Flow::Continue) => {}
                Err(e) if is_input_closed(&e) => {
                    info!("Input closed, leaving roster");
                    break;
                }
                Err(e) => {
                    error!("Unexpected error: {}", e);
                    let out = self.io.writer();
                    writeln!(out)?;
                    writeln!(out, " Unexpected Error:")?;
                    writeln!(out, "{}", e)?;
                    self.pause(2);
                }
            }
        }
        Ok(())
    }

    fn main_menu(&mut self) -> Result<Flow> {
        let out = self.io.writer();
        writeln!(out)?;
        writeln!(out, "Team Roster Manager")?;
        writeln!(out, "--------------------")?;
        writeln!(out)?;
        writeln!(out, " 1. Manage Teams")?;
        writeln!(out, " 2. Manage Players")?;
        writeln!(out, " 3. Exit")?;
        writeln!(out)?;
        write!(out, "Choice: ")?;
        out.flush()?;

        match self.read_choice()? {
            Some(1) => {
                let mut menu = KindMenu::new(&mut self.io, &self.teams, &self.options);
                menu.run()?;
            }
            Some(2) => {
                let mut menu = KindMenu::new(&mut self.io, &self.players, &self.options);
                menu.run()?;
            }
            Some(3) => {
                writeln!(self.io.writer(), "Exiting...")?;
                return Ok(Flow::Exit);
            }
            _ => {
                invalid_choice(&mut self.io)?;
                self.pause(1);
            }
        }
        Ok(Flow::Continue)
    }

    fn read_choice(&mut self) -> Result<Option<u32>> {
        Ok(self.io.read_line()?.trim().parse().ok())
    }

    fn pause(&self, multiplier: u32) {
        pause(self.options.pause * multiplier);
    }
}

/// List/add/delete menu for one record kind.
struct KindMenu<'a, T: Record, R, W> {
    io: &'a mut InputCollector<R, W>,
    store: &'a RecordStore<T>,
    options: &'a MenuOptions,
}

impl<'a, T: Record, R: BufRead, W: Write> KindMenu<'a, T, R, W> {
    fn new(io: &'a mut InputCollector<R, W>, store: &'a RecordStore<T>, options: &'a MenuOptions) -> Self {
        Self { io, store, options }
    }

    fn label() -> String {
        T::KIND.to_lowercase()
    }

    fn run(&mut self) -> Result<()> {
        loop {
            let out = self.io.writer();
            writeln!(out)?;
            writeln!(out, "{} Manager", T::KIND)?;
            writeln!(out, "--------------------")?;
            writeln!(out)?;
            writeln!(out, " 1. List {}s", T::KIND)?;
            writeln!(out, " 2. Add {}", T::KIND)?;
            writeln!(out, " 3. Delete {}", T::KIND)?;
            writeln!(out, " 4. Return to Main Menu")?;
            writeln!(out)?;
            write!(out, "Choice: ")?;
            out.flush()?;

            match self.io.read_line()?.trim().parse::<u32>().ok() {
                Some(1) => self.list()?,
                Some(2) => self.add()?,
                Some(3) => self.delete()?,
                Some(4) => return Ok(()),
                _ => {
                    invalid_choice(&mut *self.io)?;
                    pause(self.options.pause);
                }
            }
        }
    }

    fn list(&mut self) -> Result<()> {
        let records = self.store.get_all()?;
        let columns = table_columns::<T>();
        let table = ConsoleTable::new(self.options.table_width);

        let out = self.io.writer();
        writeln!(out)?;
        writeln!(out, "{}s", T::KIND)?;
        writeln!(out, "{}", table.line())?;
        let headers: Vec<String> = columns.iter().map(|f| f.prompt.to_string()).collect();
        writeln!(out, "{}", table.row(&headers))?;
        writeln!(out, "{}", table.line())?;

        if records.is_empty() {
            let label = Self::label();
            writeln!(out, "There are no {label}s to list. Try adding a {label}.")?;
        } else {
            for record in &records {
                let cells: Vec<String> = columns
                    .iter()
                    .map(|f| record.field_value(f.name).map(|v| v.to_string()).unwrap_or_default())
                    .collect();
                writeln!(out, "{}", table.row(&cells))?;
            }
        }

        writeln!(out, "{}", table.line())?;
        writeln!(out)?;
        writeln!(out, " Press [enter] to return to the menu.")?;
        out.flush()?;
        self.io.read_line()?;
        Ok(())
    }

    fn add(&mut self) -> Result<()> {
        let mut record: T = self.io.collect()?;
        record.before_add();
        let record = self.store.add(record)?;
        let id = record.key().unwrap_or_default();
        info!("Added {} {}", T::KIND, id);
        self.message(&format!("Success: Added a new {} ID: {}", Self::label(), id))
    }

    fn delete(&mut self) -> Result<()> {
        let out = self.io.writer();
        write!(out, "ID of {} to delete: ", Self::label())?;
        out.flush()?;
        let id: i64 = self.io.read_line()?.trim().parse().unwrap_or(0);

        match self.store.find_by_id(id)? {
            Some(record) => {
                self.store.delete(&record)?;
                info!("Deleted {} {}", T::KIND, id);
                self.message(&format!("{} ID: {} was deleted.", T::KIND, id))
            }
            None => self.message(&format!("ERROR: Could not find {} with ID: {}.", Self::label(), id)),
        }
    }

    fn message(&mut self, message: &str) -> Result<()> {
        let out = self.io.writer();
        writeln!(out)?;
        writeln!(out, "{}", message)?;
        out.flush()?;
        pause(self.options.pause);
        Ok(())
    }
}

fn invalid_choice<R: BufRead, W: Write>(io: &mut InputCollector<R, W>) -> Result<()> {
    let out = io.writer();
    writeln!(out)?;
    writeln!(out, " Error: Invalid Choice")?;
    out.flush()?;
    Ok(())
}

fn pause(duration: Duration) {
    if !duration.is_zero() {
        thread::sleep(duration);
    }
}

fn is_input_closed(e: &Error) -> bool {
    matches!(e, Error::Io(io_err) if io_err.kind() == io::ErrorKind::UnexpectedEof)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn quiet() -> MenuOptions {
        MenuOptions {
            pause: Duration::ZERO,
            ..MenuOptions::default()
        }
    }

    fn run_script(dir: &Path, script: &str) -> String {
        let mut app = RosterApp::open(dir, Cursor::new(script.as_bytes().to_vec()), Vec::new(), quiet()).unwrap();
        app.run().unwrap();
        String::from_utf8(app.into_inner().1).unwrap()
    }

    #[test]
    fn test_table_row_layout() {
        let table = ConsoleTable::new(17);
        // (17 - 2) / 2 = 7 per column
        let row = table.row(&["Id".to_string(), "Name".to_string()]);
        assert_eq!(row, "|   Id  | Name  |");
        assert_eq!(table.line(), format!(" {}", "-".repeat(17)));
    }

    #[test]
    fn test_table_truncates_long_cells() {
        let table = ConsoleTable::new(11);
        let row = table.row(&["x".to_string(), "abcdefghij".to_string()]);
        assert_eq!(row, "|  x | a...|");
    }

    #[test]
    fn test_player_columns() {
        let names: Vec<&str> = table_columns::<Player>().iter().map(|f| f.prompt).collect();
        assert_eq!(names, vec!["Id", "First Name", "Last Name", "Team", "Age"]);
    }

    #[test]
    fn test_exit() {
        let dir = tempdir().unwrap();
        let out = run_script(dir.path(), "3\n");
        assert!(out.contains("Team Roster Manager"));
        assert!(out.ends_with("Exiting...\n"));
    }

    #[test]
    fn test_invalid_choice_then_eof() {
        let dir = tempdir().unwrap();
        let out = run_script(dir.path(), "9\nabc\n");
        assert_eq!(out.matches(" Error: Invalid Choice").count(), 2);
    }

    #[test]
    fn test_add_and_list_team() {
        let dir = tempdir().unwrap();
        let out = run_script(dir.path(), "1\n1\n\n2\nRed\n1\n\n4\n3\n");
        assert!(out.contains("There are no teams to list. Try adding a team."));
        assert!(out.contains("Success: Added a new team ID: 1"));
        assert!(out.contains("Red"));

        let teams = RecordStore::<Team>::new(dir.path()).unwrap().get_all().unwrap();
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].team_name, "Red");
    }

    #[test]
    fn test_delete_player() {
        let dir = tempdir().unwrap();
        let script = "2\n2\nJane\nDoe\nRed\n10\n2\nJohn\nRoe\nBlue\n0\n11\n3\n1\n3\n7\n4\n3\n";
        let out = run_script(dir.path(), script);
        assert!(out.contains("Success: Added a new player ID: 2"));
        assert!(out.contains("Player ID: 1 was deleted."));
        assert!(out.contains("ERROR: Could not find player with ID: 7."));

        let players = RecordStore::<Player>::new(dir.path()).unwrap().get_all().unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].player_id, 2);
        assert_eq!(players[0].age, 11);
    }

    #[test]
    fn test_store_error_is_reported_and_loop_continues() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("Team.json"), "{ broken").unwrap();
        let out = run_script(dir.path(), "1\n1\n3\n");
        assert!(out.contains(" Unexpected Error:"));
        assert!(out.ends_with("Exiting...\n"));
    }

    #[test]
    fn test_open_missing_directory() {
        let dir = tempdir().unwrap();
        let res = RosterApp::open(dir.path().join("missing"), Cursor::new(Vec::new()), Vec::new(), quiet());
        assert!(matches!(res, Err(Error::DirectoryNotFound(_))));
    }
}
