//! Module `reply`
//!
//! Parses FTP server replies read from the control connection into
//! [`FtpReply`] values, including RFC 959 multi-line replies.

use std::fmt;
use std::io::BufRead;

use log::debug;

use crate::error::{FtpClientError, ProtocolError};

/// Reply class, taken from the first digit of the status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyClass {
    /// 1xx: action started, expect another reply.
    PositivePreliminary,
    /// 2xx: action completed.
    PositiveCompletion,
    /// 3xx: more information needed (e.g. PASS after USER).
    PositiveIntermediate,
    /// 4xx: not taken, may succeed if retried.
    TransientNegative,
    /// 5xx: not taken, will not succeed if retried unmodified.
    PermanentNegative,
}

impl ReplyClass {
    /// Classifies a three digit status code. Returns `None` outside 100..=599.
    pub fn from_code(code: u16) -> Option<Self> {
        match code / 100 {
            1 => Some(ReplyClass::PositivePreliminary),
            2 => Some(ReplyClass::PositiveCompletion),
            3 => Some(ReplyClass::PositiveIntermediate),
            4 => Some(ReplyClass::TransientNegative),
            5 => Some(ReplyClass::PermanentNegative),
            _ => None,
        }
    }

    pub fn is_success(self) -> bool {
        matches!(
            self,
            ReplyClass::PositivePreliminary
                | ReplyClass::PositiveCompletion
                | ReplyClass::PositiveIntermediate
        )
    }
}

/// A parsed server reply. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FtpReply {
    code: u16,
    class: ReplyClass,
    message: String,
}

impl FtpReply {
    /// Builds a reply from a code and message.
    ///
    /// Codes outside the 1xx-5xx range are classed as permanent negative.
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            class: ReplyClass::from_code(code).unwrap_or(ReplyClass::PermanentNegative),
            message: message.into(),
        }
    }

    /// Parses the complete text of a reply (one or more CRLF separated lines).
    pub fn parse(raw: &str) -> Result<Self, ProtocolError> {
        let mut lines = raw.lines().filter(|l| !l.is_empty());
        let first = lines
            .next()
            .ok_or_else(|| ProtocolError::MalformedReply(raw.to_string()))?;
        let (code, multiline, text) = split_status_line(first)?;

        let mut message = text.to_string();
        if multiline {
            let mut terminated = false;
            for line in lines {
                if is_final_line(line, code) {
                    append_line(&mut message, line[3..].trim_start());
                    terminated = true;
                    break;
                }
                append_line(&mut message, line);
            }
            if !terminated {
                return Err(ProtocolError::MalformedReply(raw.to_string()));
            }
        }

        Ok(Self::new(code, message))
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn class(&self) -> ReplyClass {
        self.class
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether the server accepted the command (1xx, 2xx or 3xx).
    pub fn success(&self) -> bool {
        self.class.is_success()
    }
}

impl fmt::Display for FtpReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code, self.message)
    }
}

/// Reads one complete reply from the control connection.
///
/// Lines are collected up to the final line of the reply and handed to
/// [`FtpReply::parse`].
pub fn read_reply<R: BufRead>(reader: &mut R) -> Result<FtpReply, FtpClientError> {
    let mut raw = read_line(reader)?;
    let (code, multiline, _) = split_status_line(&raw)?;

    if multiline {
        loop {
            let line = read_line(reader)?;
            raw.push('\n');
            raw.push_str(&line);
            if is_final_line(&line, code) {
                break;
            }
        }
    }

    let reply = FtpReply::parse(&raw)?;
    debug!("<-- {}", reply);
    Ok(reply)
}

fn read_line<R: BufRead>(reader: &mut R) -> Result<String, FtpClientError> {
    let mut line = String::new();
    let n = reader.read_line(&mut line)?;
    if n == 0 {
        return Err(ProtocolError::UnexpectedEof.into());
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Splits `ddd text` / `ddd-text` into (code, is-multiline, text).
fn split_status_line(line: &str) -> Result<(u16, bool, &str), ProtocolError> {
    let malformed = || ProtocolError::MalformedReply(line.to_string());

    let digits = line.get(..3).ok_or_else(malformed)?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    let code: u16 = digits.parse().map_err(|_| malformed())?;
    if ReplyClass::from_code(code).is_none() {
        return Err(malformed());
    }

    match line.as_bytes().get(3) {
        None => Ok((code, false, "")),
        Some(b' ') => Ok((code, false, &line[4..])),
        Some(b'-') => Ok((code, true, &line[4..])),
        Some(_) => Err(malformed()),
    }
}

fn is_final_line(line: &str, code: u16) -> bool {
    line.as_bytes().get(3).is_none_or(|b| *b == b' ')
        && line.get(..3).and_then(|d| d.parse::<u16>().ok()) == Some(code)
}

fn append_line(message: &mut String, line: &str) {
    if !message.is_empty() {
        message.push('\n');
    }
    message.push_str(line);
}
