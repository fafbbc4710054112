use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
};

use log::error;

use super::{Flow, Tokens, echo, is_screen};
use crate::{RouteTable, error::DriverError};

/// Command menu
const MENU: &str = "
method     (arguments)              command
------     -----------              -------
load       (filename)  ................  L
save       (filename)  ................  S
insert     (ipS, ipS)  ................  I
remove     (ipS)  .....................  R
go         (filename, filename)  ......  G
clear      ()  ........................  C
dump       ()  ........................  D
display menu  .........................  M
switch to interactive mode  ...........  X
quit program  .........................  Q
";

/// Router control harness over a [`RouteTable`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RouterDriver;

impl RouterDriver {
    /// Asks for a size estimate, then runs router commands until `Q` or end of
    /// input. Returns the final route table, or `None` if the estimate was 0.
    ///
    /// # Errors
    ///
    /// Fails on read or write errors of the console streams and if the size
    /// estimate is not a number. Route table failures are reported on `out`.
    #[allow(clippy::unused_self)]
    pub fn run<W: Write>(
        self,
        tokens: &mut Tokens,
        out: &mut W,
    ) -> Result<Option<RouteTable>, DriverError> {
        writeln!(out, "\nRouter control program started")?;
        write!(out, "  Enter approximate number of entries for RouteTable: ")?;
        let estimate: usize = match tokens.next_parsed("size estimate") {
            Ok(estimate) => estimate,
            Err(DriverError::EndOfInput) => return Ok(None),
            Err(err) => return Err(err),
        };
        echo(tokens, out, &[&estimate.to_string()])?;
        if estimate == 0 {
            return Ok(None);
        }

        let mut routes = RouteTable::new(estimate);
        if !tokens.is_batch() {
            writeln!(out, "{MENU}")?;
        }

        loop {
            write!(out, "Enter Router Command ('M' for menu, 'Q' to quit): ")?;
            let command = match tokens.next_command() {
                Ok(command) => command,
                Err(DriverError::EndOfInput) => break,
                Err(err) => return Err(err),
            };
            match execute(command, &mut routes, tokens, out) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) | Err(DriverError::EndOfInput) => break,
                Err(err @ DriverError::Malformed { .. }) => writeln!(out, "\n  ** {err}")?,
                Err(err) => return Err(err),
            }
        }
        writeln!(out, "\nRouter control program stopped")?;
        Ok(Some(routes))
    }
}

/// Runs one router command
fn execute<W: Write>(
    command: char,
    routes: &mut RouteTable,
    tokens: &mut Tokens,
    out: &mut W,
) -> Result<Flow, DriverError> {
    match command.to_ascii_uppercase() {
        'X' => {
            echo(tokens, out, &["X"])?;
            if tokens.switch_to_keyboard() {
                writeln!(out, "  ** switched to keyboard input **\n{MENU}")?;
            } else {
                writeln!(out, "  ** already using keyboard input **")?;
            }
        }
        'Q' => {
            echo(tokens, out, &["Q"])?;
            return Ok(Flow::Quit);
        }
        'M' => {
            echo(tokens, out, &["M"])?;
            writeln!(out, "{MENU}")?;
        }
        'L' => {
            write!(out, "  Enter table file name: ")?;
            let name = tokens.next_token()?;
            echo(tokens, out, &[&name])?;
            match routes.load(&name) {
                Ok(stored) => writeln!(out, "  Load() completed, {stored} routes")?,
                Err(err) => {
                    error!("router: load from {name} failed: {err}");
                    writeln!(out, "** RouteTable: {err}\n   Load() aborted")?;
                }
            }
        }
        'S' => {
            write!(out, "  Enter table file name: ")?;
            let name = tokens.next_token()?;
            echo(tokens, out, &[&name])?;
            match routes.save(&name) {
                Ok(()) => writeln!(out, "  Save() completed")?,
                Err(err) => {
                    error!("router: save to {name} failed: {err}");
                    writeln!(out, "** RouteTable: {err}\n   Save() aborted")?;
                }
            }
        }
        'I' => {
            write!(out, "  Enter destination and route (dot notation): ")?;
            let destination = tokens.next_token()?;
            let route = tokens.next_token()?;
            echo(tokens, out, &[&destination, &route])?;
            if let Err(err) = routes.insert(&destination, &route) {
                writeln!(out, "** RouteTable: {err}\n   Insert() aborted")?;
            }
        }
        'R' => {
            write!(out, "  Enter destination (dot notation): ")?;
            let destination = tokens.next_token()?;
            echo(tokens, out, &[&destination])?;
            match routes.remove(&destination) {
                Ok(true) => {}
                Ok(false) => writeln!(out, "  no route for {destination}")?,
                Err(err) => writeln!(out, "** RouteTable: {err}\n   Remove() aborted")?,
            }
        }
        'G' => {
            write!(out, "                  Enter msg file name: ")?;
            let messages = tokens.next_token()?;
            echo(tokens, out, &[&messages])?;
            write!(out, "  Enter log file name (0 for default): ")?;
            let log = tokens.next_token()?;
            echo(tokens, out, &[&log])?;
            go(routes, &messages, &log, out)?;
        }
        'C' => {
            echo(tokens, out, &["C"])?;
            routes.clear();
        }
        'D' => {
            write!(out, "  Enter Dump file name (0 for default): ")?;
            let name = tokens.next_token()?;
            echo(tokens, out, &[&name])?;
            let dumped = if is_screen(&name) {
                routes.dump_to(&mut *out)
            } else {
                File::create(&name)
                    .map_err(Into::into)
                    .and_then(|file| routes.dump_to(BufWriter::new(file)))
            };
            if let Err(err) = dumped {
                error!("router: dump to {name} failed: {err}");
                writeln!(out, "** RouteTable: {err}\n   Dump() aborted")?;
            }
        }
        other => {
            echo(tokens, out, &[&other.to_string()])?;
            writeln!(out, "  Try again")?;
        }
    }
    Ok(Flow::Continue)
}

/// Routes the messages in file `messages`, logging to file `log` or to `out`
/// for "0"
fn go<W: Write>(
    routes: &RouteTable,
    messages: &str,
    log: &str,
    out: &mut W,
) -> Result<(), DriverError> {
    let input = match File::open(messages) {
        Ok(file) => BufReader::new(file),
        Err(err) => {
            error!("router: cannot open msg file {messages}: {err}");
            writeln!(out, "** RouteTable: unable to open msg file {messages}\n   Go() aborted")?;
            return Ok(());
        }
    };

    writeln!(out, "  Router simulation started")?;
    let routed = if is_screen(log) {
        routes.route_messages(input, &mut *out)
    } else {
        match File::create(log) {
            Ok(file) => routes.route_messages(input, BufWriter::new(file)),
            Err(err) => {
                error!("router: cannot open log file {log}: {err}");
                writeln!(out, "** RouteTable: unable to open log file {log}\n   Go() aborted")?;
                return Ok(());
            }
        }
    };
    match routed {
        Ok(count) => writeln!(out, "  Router simulation stopped, {count} messages")?,
        Err(err) => writeln!(out, "** RouteTable: {err}\n   Go() aborted")?,
    }
    Ok(())
}
