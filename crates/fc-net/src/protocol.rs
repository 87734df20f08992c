//! Wire format.
//!
//! Every message in either direction is one fixed 16-byte frame of four
//! little-endian `i32` words:
//!
//! ```text
//! request:  [ command | class | client_id | reserved ]
//! reply:    [ code    | 0     | 0         | 0        ]
//! status:   [ active  | occupied | capacity | 0      ]
//! ```
//!
//! | Word      | Values                                          |
//! |-----------|-------------------------------------------------|
//! | `command` | 1 = CHECK, 2 = ENTER, 3 = EXIT, 4 = STATUS      |
//! | `class`   | 0 = none, 1 = A, 2 = B                          |
//! | `code`    | 0 = DENIED, 1 = OK                              |
//! | `active`  | class code of the occupants, 0 when empty       |
//!
//! A STATUS request is answered with a status frame; every other request
//! with a reply frame.

use fc_core::Class;

use crate::{NetError, NetResult};

pub const FRAME_LEN: usize = 16;

pub type Frame = [u8; FRAME_LEN];

fn pack(words: [i32; 4]) -> Frame {
    let mut frame = [0u8; FRAME_LEN];
    for (chunk, word) in frame.chunks_exact_mut(4).zip(words) {
        chunk.copy_from_slice(&word.to_le_bytes());
    }
    frame
}

fn unpack(frame: &Frame) -> [i32; 4] {
    let mut words = [0i32; 4];
    for (word, chunk) in words.iter_mut().zip(frame.chunks_exact(4)) {
        *word = i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    words
}

pub fn class_code(class: Option<Class>) -> i32 {
    match class {
        None           => 0,
        Some(Class::A) => 1,
        Some(Class::B) => 2,
    }
}

pub fn class_from_code(code: i32) -> NetResult<Option<Class>> {
    match code {
        0 => Ok(None),
        1 => Ok(Some(Class::A)),
        2 => Ok(Some(Class::B)),
        other => Err(NetError::UnknownClass(other)),
    }
}

// ── Requests ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Command {
    /// Would an actor of this class be admitted right now?  Never blocks.
    Check  = 1,
    /// Block until admitted (OK) or the server shuts down (DENIED).
    Enter  = 2,
    /// Give back a slot this connection holds.
    Exit   = 3,
    /// Report class, occupancy and capacity.
    Status = 4,
}

impl TryFrom<i32> for Command {
    type Error = NetError;

    fn try_from(code: i32) -> NetResult<Self> {
        match code {
            1 => Ok(Command::Check),
            2 => Ok(Command::Enter),
            3 => Ok(Command::Exit),
            4 => Ok(Command::Status),
            other => Err(NetError::UnknownCommand(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request {
    pub command:   Command,
    pub class:     Option<Class>,
    /// Free-form identifier chosen by the client, echoed into server logs.
    pub client_id: i32,
}

impl Request {
    pub fn encode(&self) -> Frame {
        pack([self.command as i32, class_code(self.class), self.client_id, 0])
    }

    pub fn decode(frame: &Frame) -> NetResult<Self> {
        let [command, class, client_id, _reserved] = unpack(frame);
        Ok(Request {
            command: Command::try_from(command)?,
            class: class_from_code(class)?,
            client_id,
        })
    }
}

// ── Replies ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    Denied,
    Ok,
}

impl Reply {
    pub fn from_bool(ok: bool) -> Self {
        if ok { Reply::Ok } else { Reply::Denied }
    }

    pub fn is_ok(self) -> bool {
        self == Reply::Ok
    }

    pub fn encode(self) -> Frame {
        let code = match self {
            Reply::Denied => 0,
            Reply::Ok     => 1,
        };
        pack([code, 0, 0, 0])
    }

    pub fn decode(frame: &Frame) -> NetResult<Self> {
        match unpack(frame)[0] {
            0 => Ok(Reply::Denied),
            1 => Ok(Reply::Ok),
            other => Err(NetError::UnknownReply(other)),
        }
    }
}

/// Answer to a STATUS request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    pub active:   Option<Class>,
    pub occupied: u32,
    pub capacity: u32,
}

impl Status {
    pub fn encode(&self) -> Frame {
        pack([
            class_code(self.active),
            i32::try_from(self.occupied).unwrap_or(i32::MAX),
            i32::try_from(self.capacity).unwrap_or(i32::MAX),
            0,
        ])
    }

    pub fn decode(frame: &Frame) -> NetResult<Self> {
        let [active, occupied, capacity, _] = unpack(frame);
        Ok(Status {
            active:   class_from_code(active)?,
            occupied: occupied.max(0) as u32,
            capacity: capacity.max(0) as u32,
        })
    }
}
