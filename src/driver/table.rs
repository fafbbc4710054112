use std::{
    fs::File,
    hash::BuildHasher,
    io::{self, BufReader, BufWriter, Write},
};

use log::error;

use super::{Flow, Tokens, echo, is_screen};
use crate::{HashTable, Sizing, error::DriverError, hashers::DefaultHashBuilder, stats::BucketStats};

/// Table the harness drives
type Table<H> = HashTable<String, i32, H>;

/// Command menu
const MENU: &str = "\
 OPERATION                             ENTRY
 ---------                             -----
 Load data from file  ...............  L filename
 save data to File  .................  F filename
 x.insert(key,data)  ................  + key data
 x.remove(key)  .....................  - key
 x.includes(key)  ...................  I key
 x.retrieve(key,&data)  .............  R key
 x.put(key,data)  ...................  P key data
 x.get_or_insert_default(key)  ......  G key
 x.clear()  .........................  C
 x.rehash(num_buckets)  .............  H num_buckets
 x.len()  ...........................  S
 bucket Analysis  ...................  A
 x.is_empty()  ......................  E
 x.dump(filename)  ..................  D
 display begin to end  ..............  O
 iTerator test  .....................  T
 display Menu   .....................  M
 switch from batch mode  ............  X
 Quit program   .....................  Q
";

/// Interactive harness over a `String -> i32` table.
///
/// Every table operation is reachable through a one-letter command; see the
/// menu (`M`) for the full list.
#[derive(Debug, Clone)]
pub struct TableDriver<H = DefaultHashBuilder> {
    /// Hash strategy for the table
    hasher: H,
    /// Sizing policy for the initial bucket count
    sizing: Sizing,
    /// Shown in the prompt
    hash_name: String,
}

impl<H> TableDriver<H>
where
    H: BuildHasher + Clone,
{
    /// Harness building its table with `hasher` and `sizing`
    #[must_use]
    pub fn new(hasher: H, sizing: Sizing, hash_name: impl Into<String>) -> Self {
        Self { hasher, sizing, hash_name: hash_name.into() }
    }

    /// Asks for a bucket estimate, then runs commands until `Q` or end of input.
    /// Returns the final table, or `None` if the estimate was 0.
    ///
    /// # Errors
    ///
    /// Fails on read or write errors of the console streams, and if the bucket
    /// estimate is not a number. Failures inside a command are reported on `out`
    /// and the loop continues.
    pub fn run<W: Write>(
        &self,
        tokens: &mut Tokens,
        out: &mut W,
    ) -> Result<Option<Table<H>>, DriverError> {
        write!(out, "  Enter approximate number of buckets (0 to quit): ")?;
        let estimate: usize = match tokens.next_parsed("bucket estimate") {
            Ok(estimate) => estimate,
            Err(DriverError::EndOfInput) => return Ok(None),
            Err(err) => return Err(err),
        };
        echo(tokens, out, &[&estimate.to_string()])?;
        if estimate == 0 {
            return Ok(None);
        }

        let mut table = HashTable::with_hasher_and_sizing(estimate, self.hasher.clone(), self.sizing);
        if !tokens.is_batch() {
            writeln!(out, "{MENU}")?;
        }

        loop {
            write!(
                out,
                "HashTable < String , i32 , {} >\nEnter [command][arguments] ('M' for menu, 'Q' to quit): ",
                self.hash_name
            )?;
            let command = match tokens.next_command() {
                Ok(command) => command,
                Err(DriverError::EndOfInput) => break,
                Err(err) => return Err(err),
            };
            match execute(command, &mut table, tokens, out) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) | Err(DriverError::EndOfInput) => break,
                Err(err @ DriverError::Malformed { .. }) => writeln!(out, "\n  ** {err}")?,
                Err(err) => return Err(err),
            }
        }
        writeln!(out)?;
        Ok(Some(table))
    }
}

/// Runs one command
#[allow(clippy::too_many_lines)]
fn execute<H, W>(
    command: char,
    table: &mut Table<H>,
    tokens: &mut Tokens,
    out: &mut W,
) -> Result<Flow, DriverError>
where
    H: BuildHasher + Clone,
    W: Write,
{
    match command.to_ascii_uppercase() {
        'M' => {
            echo(tokens, out, &["M"])?;
            writeln!(out, "{MENU}")?;
        }
        'X' => {
            echo(tokens, out, &["X"])?;
            if tokens.switch_to_keyboard() {
                writeln!(out, "   ** switched to keyboard input **\n{MENU}")?;
            } else {
                writeln!(out, "  ** already using keyboard input **")?;
            }
        }
        'Q' => {
            echo(tokens, out, &["Q"])?;
            return Ok(Flow::Quit);
        }
        'P' => {
            let key = tokens.next_token()?;
            let data: i32 = tokens.next_parsed("integer data")?;
            echo(tokens, out, &["P", &key, &data.to_string()])?;
            writeln!(out, "Put({key},{data})")?;
            table.put(key, data);
        }
        'G' => {
            let key = tokens.next_token()?;
            echo(tokens, out, &["G", &key])?;
            let data = *table.get_or_insert_default(key.clone());
            writeln!(out, "  Get({key}) = {data}")?;
        }
        '+' | '1' => {
            let key = tokens.next_token()?;
            let data: i32 = tokens.next_parsed("integer data")?;
            echo(tokens, out, &[&command.to_string(), &key, &data.to_string()])?;
            writeln!(out, "{key}:{data} inserted into table")?;
            table.insert(key, data);
        }
        '-' | '2' => {
            let key = tokens.next_token()?;
            echo(tokens, out, &[&command.to_string(), &key])?;
            if table.remove(key.as_str()) {
                writeln!(out, "  key {key} removed from table")?;
            } else {
                writeln!(out, "  key {key} not found in table")?;
            }
        }
        'L' => {
            write!(out, "  Enter data file name (0 to abort): ")?;
            let name = tokens.next_token()?;
            echo(tokens, out, &[&name])?;
            if !is_screen(&name) {
                load_pairs(table, &name, out)?;
            }
        }
        'F' => {
            write!(out, "  Enter data file name (0 for screen): ")?;
            let name = tokens.next_token()?;
            echo(tokens, out, &[&name])?;
            write_to(out, &name, "save", |sink| save_pairs(table, sink))?;
        }
        'D' => {
            write!(out, "  Enter data file name (0 for screen): ")?;
            let name = tokens.next_token()?;
            echo(tokens, out, &[&name])?;
            write_to(out, &name, "Dump()", |sink| table.dump(sink, 0, 0))?;
        }
        'O' => {
            write!(out, "  Enter data file name (0 for screen): ")?;
            let name = tokens.next_token()?;
            echo(tokens, out, &[&name])?;
            write_to(out, &name, "Display()", |sink| display(table, sink))?;
        }
        'I' => {
            let key = tokens.next_token()?;
            echo(tokens, out, &["I", &key])?;
            write!(out, " includes(key): ")?;
            match table.includes(key.as_str()).peek() {
                Some(entry) => writeln!(out, "entry {entry} found")?,
                None => writeln!(out, "key {key} not found")?,
            }
        }
        'R' => {
            let key = tokens.next_token()?;
            echo(tokens, out, &["R", &key])?;
            write!(out, " retrieve(key,data): ")?;
            let mut data = 0;
            if table.retrieve(key.as_str(), &mut data) {
                writeln!(out, "data {data} retrieved for key {key}")?;
            } else {
                writeln!(out, "key {key} not found")?;
            }
        }
        'E' => {
            echo(tokens, out, &["E"])?;
            let verdict = if table.is_empty() { "empty" } else { "not empty" };
            writeln!(out, "  table is {verdict}")?;
        }
        'S' => {
            echo(tokens, out, &["S"])?;
            writeln!(out, "  table size:      {}", table.len())?;
            writeln!(out, "  max bucket size: {}", table.max_bucket_size())?;
        }
        'A' => {
            echo(tokens, out, &["A"])?;
            writeln!(out, "  {}", BucketStats::of(table))?;
        }
        'C' => {
            echo(tokens, out, &["C"])?;
            table.clear();
        }
        'H' => {
            let estimate: usize = tokens.next_parsed("bucket estimate")?;
            echo(tokens, out, &["H", &estimate.to_string()])?;
            table.rehash(estimate);
            writeln!(out, "  rehashed to {} buckets", table.bucket_count())?;
        }
        'T' => {
            write!(out, "Enter a key:  ")?;
            let key = tokens.next_token()?;
            echo(tokens, out, &[&key])?;
            iterator_test(table, &key, out)?;
        }
        other => {
            echo(tokens, out, &[&other.to_string()])?;
            writeln!(out, " ** undefined command '{other}'")?;
        }
    }
    Ok(Flow::Continue)
}

/// Inserts `key data` pairs read from the file `name` until the file ends or a
/// data field does not parse
fn load_pairs<H, W>(table: &mut Table<H>, name: &str, out: &mut W) -> io::Result<()>
where
    H: BuildHasher + Clone,
    W: Write,
{
    let file = match File::open(name) {
        Ok(file) => file,
        Err(err) => {
            error!("table driver: cannot open {name}: {err}");
            return writeln!(out, "  Unable to open file {name}\n  Load() aborted");
        }
    };

    let mut pairs = Tokens::interactive(Box::new(BufReader::new(file)));
    loop {
        let key = match pairs.next_token() {
            Ok(key) => key,
            Err(DriverError::Io(err)) => return Err(err),
            Err(_) => break,
        };
        match pairs.next_parsed::<i32>("integer data") {
            Ok(data) => {
                table.insert(key, data);
            }
            Err(DriverError::Io(err)) => return Err(err),
            Err(_) => break,
        }
    }
    writeln!(out, "  load completed")
}

/// Runs `render` against standard output for the file name "0", or against the
/// named file otherwise
fn write_to<W, F>(out: &mut W, name: &str, what: &str, render: F) -> io::Result<()>
where
    W: Write,
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    if is_screen(name) {
        return render(out);
    }
    let file = match File::create(name) {
        Ok(file) => file,
        Err(err) => {
            error!("table driver: cannot create {name}: {err}");
            return writeln!(out, "  Unable to open file {name}\n  {what} aborted");
        }
    };
    let mut sink = BufWriter::new(file);
    render(&mut sink)?;
    sink.flush()?;
    writeln!(out, "  {what} completed: {name}")
}

/// `key<TAB>data` per entry, walking while the cursor is valid
fn save_pairs<H>(table: &Table<H>, sink: &mut dyn Write) -> io::Result<()> {
    let mut cursor = table.begin();
    while let Some(entry) = cursor.peek() {
        writeln!(sink, "{}\t{}", entry.key, entry.value)?;
        cursor.advance();
    }
    Ok(())
}

/// `key<TAB>data` per entry, walking from begin to end
fn display<H>(table: &Table<H>, sink: &mut dyn Write) -> io::Result<()> {
    let end = table.end();
    let mut cursor = table.begin();
    while cursor != end {
        if let Ok(entry) = cursor.entry() {
            writeln!(sink, "{}\t{}", entry.key, entry.value)?;
        }
        cursor.advance();
    }
    Ok(())
}

/// Walks begin to end twice and then from `key` to end
fn iterator_test<H, W>(table: &Table<H>, key: &str, out: &mut W) -> io::Result<()>
where
    H: BuildHasher + Clone,
    W: Write,
{
    writeln!(out, "\nTesting begin() to end() with advance()")?;
    let end = table.end();
    let mut cursor = table.begin();
    while cursor != end {
        if let Ok(entry) = cursor.entry() {
            write!(out, "{entry},")?;
        }
        cursor.advance();
    }

    writeln!(out, "\n\nTesting begin() to end() as an iterator")?;
    for (k, v) in table {
        write!(out, "{k}:{v},")?;
    }

    writeln!(out, "\n\nTesting includes({key}) to end()")?;
    for (k, v) in table.includes(key) {
        write!(out, "{k}:{v},")?;
    }
    writeln!(out, "\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashers::Fnv1aBuilder;
    use std::{env, fs, process};

    fn run(script: &'static str) -> (Option<Table<DefaultHashBuilder>>, String) {
        let driver = TableDriver::new(DefaultHashBuilder::default(), Sizing::Primed, "default");
        let mut tokens = Tokens::interactive(Box::new(script.as_bytes()));
        let mut out = Vec::new();
        let table = driver.run(&mut tokens, &mut out).unwrap();
        (table, String::from_utf8(out).unwrap())
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        env::temp_dir().join(format!("chaintable-{}-{name}", process::id()))
    }

    #[test]
    fn test_zero_estimate_quits() {
        let (table, _) = run("0\n+ a 1\n");
        assert!(table.is_none());
    }

    #[test]
    fn test_table_operations() {
        let (table, out) = run("10\n+ a 1\n1 b 2\nP c 3\nG d\n- b\n2 zz\nI a\nR c\nR zz\nS\nE\nQ\n");
        let table = table.unwrap();

        assert_eq!(table.bucket_count(), 7);
        assert_eq!(table.len(), 3);
        assert!(out.contains("a:1 inserted into table"));
        assert!(out.contains("Put(c,3)"));
        assert!(out.contains("  Get(d) = 0"));
        assert!(out.contains("  key b removed from table"));
        assert!(out.contains("  key zz not found in table"));
        assert!(out.contains("entry a:1 found"));
        assert!(out.contains("data 3 retrieved for key c"));
        assert!(out.contains("key zz not found"));
        assert!(out.contains("  table size:      3"));
        assert!(out.contains("  table is not empty"));
    }

    #[test]
    fn test_clear_rehash_and_analysis() {
        let (table, out) = run("5\n+ a 1\n+ b 2\nH 30\nA\nC\nE\n");
        let table = table.unwrap();

        assert_eq!(table.bucket_count(), 29);
        assert!(table.is_empty());
        assert!(out.contains("rehashed to 29 buckets"));
        assert!(out.contains("2 entries in 29 buckets"));
        assert!(out.contains("  table is empty"));
    }

    #[test]
    fn test_malformed_argument_does_not_stop_the_loop() {
        let (table, out) = run("3\n+ a one\n+ a 1\nQ\n");
        assert!(out.contains("integer data expected, found 'one'"));
        assert_eq!(table.unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_command() {
        let (_, out) = run("3\nZ\nQ\n");
        assert!(out.contains(" ** undefined command 'Z'"));
    }

    #[test]
    fn test_screen_listings() {
        let (_, out) = run("3\n+ a 1\nF 0\nO 0\nD 0\nT a\n");
        assert_eq!(out.matches("a\t1\n").count(), 2);
        assert!(out.contains("b[0]:"));
        assert!(out.contains("a:1,"));
        assert!(out.contains("Testing includes(a) to end()"));
    }

    #[test]
    fn test_save_then_load_file() {
        let path = temp_path("pairs.txt");
        let name = path.to_string_lossy().into_owned();
        let save = format!("7\n+ a 1\n+ b 2\nF {name}\nQ\n");
        let load = format!("7\nL {name}\nL {name}-missing\nQ\n");

        let driver = TableDriver::new(Fnv1aBuilder::default(), Sizing::Exact, "fnv");
        let mut out = Vec::new();
        driver.run(&mut Tokens::interactive(Box::new(io::Cursor::new(save))), &mut out).unwrap();

        let mut out = Vec::new();
        let table =
            driver.run(&mut Tokens::interactive(Box::new(io::Cursor::new(load))), &mut out).unwrap();
        fs::remove_file(&path).unwrap();

        let table = table.unwrap();
        let mut data = 0;
        assert!(table.retrieve("b", &mut data));
        assert_eq!(data, 2);
        assert_eq!(table.len(), 2);
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("  load completed"));
        assert!(out.contains("Load() aborted"));
    }

    #[test]
    fn test_batch_echo_and_switch() {
        let driver = TableDriver::new(DefaultHashBuilder::default(), Sizing::Primed, "default");
        let mut tokens = Tokens::batch(
            Box::new("4\n+ k 9\nX\n+ never 0\n".as_bytes()),
            Box::new("S\nQ\n".as_bytes()),
        );
        let mut out = Vec::new();
        let table = driver.run(&mut tokens, &mut out).unwrap().unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.contains("+ k 9\n"));
        assert!(out.contains("switched to keyboard input"));
        assert!(out.contains("  table size:      1"));
        assert_eq!(table.len(), 1);
    }
}
