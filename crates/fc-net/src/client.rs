//! Async client for the arbitration server.

use fc_core::Class;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, ToSocketAddrs};

use crate::protocol::{Command, Frame, FRAME_LEN, Reply, Request, Status};
use crate::NetResult;

/// One connection to the server.  Requests are answered strictly in order.
///
/// Slots entered through a client are tied to its connection: dropping the
/// client releases them on the server.
pub struct Client {
    stream: TcpStream,
    id:     i32,
}

impl Client {
    pub async fn connect(addr: impl ToSocketAddrs, id: i32) -> NetResult<Self> {
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;
        Ok(Self { stream, id })
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    async fn call(&mut self, command: Command, class: Option<Class>) -> NetResult<Frame> {
        let request = Request { command, class, client_id: self.id };
        self.stream.write_all(&request.encode()).await?;
        let mut frame: Frame = [0; FRAME_LEN];
        self.stream.read_exact(&mut frame).await?;
        Ok(frame)
    }

    /// Would `class` be admitted right now?  Never blocks on the server.
    pub async fn check(&mut self, class: Class) -> NetResult<bool> {
        let frame = self.call(Command::Check, Some(class)).await?;
        Ok(Reply::decode(&frame)?.is_ok())
    }

    /// Wait until admitted.  `false` means the server shut down first.
    pub async fn enter(&mut self, class: Class) -> NetResult<bool> {
        let frame = self.call(Command::Enter, Some(class)).await?;
        Ok(Reply::decode(&frame)?.is_ok())
    }

    /// Release a slot.  `false` if this connection held no slot of `class`.
    pub async fn exit(&mut self, class: Class) -> NetResult<bool> {
        let frame = self.call(Command::Exit, Some(class)).await?;
        Ok(Reply::decode(&frame)?.is_ok())
    }

    pub async fn status(&mut self) -> NetResult<Status> {
        let frame = self.call(Command::Status, None).await?;
        Status::decode(&frame)
    }
}
