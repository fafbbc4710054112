//! Classful IPv4 route lookup built on [`HashTable`].
//!
//! The table maps a destination address to the address of the next hop. Both
//! are plain 32-bit numbers; the dotted-quad form is only used at the edges,
//! when routes are entered by hand and when messages are routed.
//!
//! Classes are decided by the leading bits of an address:
//!
//! | class | leading bits | net id mask  | host id mask |
//! |-------|--------------|--------------|--------------|
//! | A     | `0`          | `0x7f000000` | `0x00ffffff` |
//! | B     | `10`         | `0x3fff0000` | `0x0000ffff` |
//! | C     | `110`        | `0x1fffff00` | `0x000000ff` |
//!
//! Zero and everything else is [`IpClass::Bad`].

use std::{
    fmt,
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use log::{info, warn};

use crate::{
    HashTable,
    error::{AddressError, RouteError},
    hashers::IntMixBuilder,
};

/// A 32-bit IPv4 address, first dotted field in the high byte
pub type IpNumber = u32;

/// Address class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpClass {
    /// Leading bit `0`
    A,
    /// Leading bits `10`
    B,
    /// Leading bits `110`
    C,
    /// Zero or any other prefix
    Bad,
}

impl fmt::Display for IpClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::Bad => 'D',
        };
        write!(f, "{tag}")
    }
}

/// An address split into class, network id and host id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classified {
    /// Class of the address
    pub class: IpClass,
    /// Network part, 0 for [`IpClass::Bad`]
    pub net_id: IpNumber,
    /// Host part, 0 for [`IpClass::Bad`]
    pub host_id: IpNumber,
}

/// Classifies `address` and masks out its network and host ids.
#[must_use]
pub const fn interpret(address: IpNumber) -> Classified {
    let (class, net_mask, host_mask) = if address == 0 {
        (IpClass::Bad, 0, 0)
    } else if address & 0x8000_0000 == 0 {
        (IpClass::A, 0x7f00_0000, 0x00ff_ffff)
    } else if address & 0xc000_0000 == 0x8000_0000 {
        (IpClass::B, 0x3fff_0000, 0x0000_ffff)
    } else if address & 0xe000_0000 == 0xc000_0000 {
        (IpClass::C, 0x1fff_ff00, 0x0000_00ff)
    } else {
        (IpClass::Bad, 0, 0)
    };
    Classified { class, net_id: address & net_mask, host_id: address & host_mask }
}

/// Parses dotted-quad notation `N1.N2.N3.N4`, each field a decimal in `0..=255`.
///
/// # Errors
///
/// Returns the first [`AddressError`] met scanning left to right. Nothing may
/// follow the fourth field, not even whitespace.
pub fn parse_dotted(text: &str) -> Result<IpNumber, AddressError> {
    let mut chars = text.chars().peekable();
    let mut octets = [0_u8; 4];

    for (field, octet) in (1..).zip(&mut octets) {
        if !chars.peek().is_some_and(char::is_ascii_digit) {
            return Err(AddressError::DigitExpected { field });
        }
        while let Some(digit) = chars.next_if(char::is_ascii_digit) {
            let digit = digit.to_digit(10).and_then(|d| u8::try_from(d).ok()).unwrap_or(0);
            *octet = octet
                .checked_mul(10)
                .and_then(|value| value.checked_add(digit))
                .ok_or(AddressError::FieldTooLarge { field })?;
        }
        if field < 4 && chars.next_if_eq(&'.').is_none() {
            return Err(AddressError::DotExpected { field });
        }
    }

    if chars.next().is_some() {
        return Err(AddressError::TrailingInput);
    }
    Ok(u32::from_be_bytes(octets))
}

/// Parses one hex number, with or without a `0x` prefix
fn parse_hex(word: &str) -> Option<IpNumber> {
    let digits = word.strip_prefix("0x").or_else(|| word.strip_prefix("0X")).unwrap_or(word);
    IpNumber::from_str_radix(digits, 16).ok()
}

/// Calls `visit` with consecutive pairs of whitespace-separated words until
/// input ends or `visit` returns false. A trailing odd word is ignored.
fn for_each_pair<R, F>(reader: R, mut visit: F) -> Result<(), RouteError>
where
    R: BufRead,
    F: FnMut(&str, &str) -> bool,
{
    let mut pending: Option<String> = None;
    for line in reader.lines() {
        let line = line?;
        for word in line.split_whitespace() {
            match pending.take() {
                None => pending = Some(word.to_owned()),
                Some(first) => {
                    if !visit(&first, word) {
                        return Ok(());
                    }
                }
            }
        }
    }
    Ok(())
}

/// Destination to next-hop table.
#[derive(Debug)]
pub struct RouteTable {
    /// destination -> route
    table: HashTable<IpNumber, IpNumber, IntMixBuilder>,
}

impl RouteTable {
    /// Creates an empty table sized for about `size_estimate` routes
    #[must_use]
    pub fn new(size_estimate: usize) -> Self {
        Self { table: HashTable::with_hasher(size_estimate, IntMixBuilder::default()) }
    }

    /// Adds or replaces the route for a destination, both in dotted notation.
    ///
    /// # Errors
    ///
    /// Fails without touching the table if either address is malformed or not
    /// of class A, B or C.
    pub fn insert(&mut self, destination: &str, route: &str) -> Result<(), RouteError> {
        let dest = parse_dotted(destination)?;
        if interpret(dest).class == IpClass::Bad {
            warn!("route table: bad destination number {dest:08X}, insert aborted");
            return Err(RouteError::BadDestination(dest));
        }
        let hop = parse_dotted(route)?;
        if interpret(hop).class == IpClass::Bad {
            warn!("route table: bad route number {hop:08X}, insert aborted");
            return Err(RouteError::BadRoute(hop));
        }
        self.table.insert(dest, hop);
        Ok(())
    }

    /// Removes the route for a destination in dotted notation. Returns false if
    /// there was none.
    ///
    /// # Errors
    ///
    /// Fails if `destination` is malformed.
    pub fn remove(&mut self, destination: &str) -> Result<bool, RouteError> {
        let dest = parse_dotted(destination)?;
        Ok(self.table.remove(&dest))
    }

    /// Drops every route
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Number of routes
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// True when no route is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Next hop for `destination`
    #[must_use]
    pub fn route(&self, destination: IpNumber) -> Option<IpNumber> {
        let mut hop = 0;
        self.table.retrieve(&destination, &mut hop).then_some(hop)
    }

    /// The underlying table
    #[must_use]
    pub fn table(&self) -> &HashTable<IpNumber, IpNumber, IntMixBuilder> {
        &self.table
    }

    /// Reads `destination route` hex pairs until input ends or a number does not
    /// parse. Pairs with a zero on either side are skipped. Returns how many
    /// pairs were stored.
    ///
    /// # Errors
    ///
    /// Propagates read failures.
    pub fn load_from<R: BufRead>(&mut self, reader: R) -> Result<usize, RouteError> {
        let mut stored: usize = 0;
        for_each_pair(reader, |dest, hop| match (parse_hex(dest), parse_hex(hop)) {
            (Some(dest), Some(hop)) => {
                if dest != 0 && hop != 0 {
                    self.table.insert(dest, hop);
                    stored = stored.saturating_add(1);
                }
                true
            }
            _ => false,
        })?;
        Ok(stored)
    }

    /// [`RouteTable::load_from`] on a file
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be opened or read.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<usize, RouteError> {
        let stored = self.load_from(BufReader::new(File::open(path.as_ref())?))?;
        info!("route table: loaded {stored} routes from {}", path.as_ref().display());
        Ok(stored)
    }

    /// Writes every route as `DDDDDDDD RRRRRRRR`, zero-filled uppercase hex, in
    /// table order
    ///
    /// # Errors
    ///
    /// Propagates write failures.
    pub fn save_to<W: Write>(&self, mut writer: W) -> Result<(), RouteError> {
        let end = self.table.end();
        let mut cursor = self.table.begin();
        while cursor != end {
            if let Ok(entry) = cursor.entry() {
                writeln!(writer, "{:08X} {:08X}", entry.key, entry.value)?;
            }
            cursor.advance();
        }
        writer.flush()?;
        Ok(())
    }

    /// [`RouteTable::save_to`] on a file
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be created or written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), RouteError> {
        self.save_to(BufWriter::new(File::create(path.as_ref())?))?;
        info!("route table: saved {} routes to {}", self.len(), path.as_ref().display());
        Ok(())
    }

    /// Writes the route count and a bucket dump in hex
    ///
    /// # Errors
    ///
    /// Propagates write failures.
    pub fn dump_to<W: Write>(&self, mut writer: W) -> Result<(), RouteError> {
        write!(writer, "\nSize(): {}\nDump():\n", self.len())?;
        self.table.dump_with(&mut writer, |dest, hop| format!("{dest:08X}:{hop:08X}"))?;
        writer.flush()?;
        Ok(())
    }

    /// Routes `<dotted-destination> <message-id>` pairs read from `messages`,
    /// writing one log line per message. Returns the number of messages.
    ///
    /// A destination that does not parse is routed as address 0, which is of the
    /// bad class.
    ///
    /// # Errors
    ///
    /// Propagates read and write failures.
    pub fn route_messages<R, W>(&self, messages: R, mut log: W) -> Result<usize, RouteError>
    where
        R: BufRead,
        W: Write,
    {
        let mut routed: usize = 0;
        let mut failure = None;
        for_each_pair(messages, |dest_text, message_id| {
            let dest = parse_dotted(dest_text).unwrap_or_else(|err| {
                warn!("route table: message {message_id}: {err}");
                0
            });
            match self.write_route_line(&mut log, dest, message_id) {
                Ok(()) => {
                    routed = routed.saturating_add(1);
                    true
                }
                Err(err) => {
                    failure = Some(err);
                    false
                }
            }
        })?;
        if let Some(err) = failure {
            return Err(err.into());
        }
        log.flush()?;
        info!("route table: routed {routed} messages");
        Ok(routed)
    }

    /// One line of the routing log
    fn write_route_line<W: Write>(
        &self,
        log: &mut W,
        dest: IpNumber,
        message_id: &str,
    ) -> std::io::Result<()> {
        write!(log, "msgID: {message_id:>5} dest: {dest:08X}")?;
        if interpret(dest).class == IpClass::Bad {
            return writeln!(log, " NOT ROUTED -- BAD IP CLASS");
        }
        match self.route(dest) {
            Some(hop) => {
                let Classified { class, net_id, host_id } = interpret(hop);
                writeln!(log, " route class: {class} netID: {net_id:08X} hostID: {host_id:08X}")
            }
            None => writeln!(log, " NOT ROUTED -- NO TABLE ENTRY"),
        }
    }
}
