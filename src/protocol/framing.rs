use tokio::io::{AsyncRead, AsyncReadExt};

/// Accumulates bytes from a socket and yields complete `\n`-terminated
/// lines, buffering any partial line across reads. Used for both the
/// one-line handshake name and the steady-state stream of direction
/// commands.
pub struct LineReader<R> {
    inner: R,
    buf: Vec<u8>,
    chunk: [u8; 4096],
}

impl<R: AsyncRead + Unpin> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: Vec::new(),
            chunk: [0u8; 4096],
        }
    }

    /// Read the next complete line (delimiter stripped). `Ok(None)`
    /// means a clean EOF with no pending partial line; a partial line
    /// still in the buffer at EOF is flushed as a final line.
    pub async fn next_line(&mut self) -> std::io::Result<Option<String>> {
        loop {
            if let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = self.buf.drain(..=pos).collect();
                let text = String::from_utf8_lossy(&line[..line.len() - 1]).into_owned();
                return Ok(Some(text));
            }

            let n = self.inner.read(&mut self.chunk).await?;
            if n == 0 {
                if self.buf.is_empty() {
                    return Ok(None);
                }
                let text = String::from_utf8_lossy(&self.buf).into_owned();
                self.buf.clear();
                return Ok(Some(text));
            }

            self.buf.extend_from_slice(&self.chunk[..n]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;

    #[tokio::test]
    async fn reads_a_single_line() {
        let (mut client, server) = tokio::io::duplex(64);
        client.write_all(b"alice\n").await.unwrap();
        drop(client);

        let mut reader = LineReader::new(server);
        assert_eq!(reader.next_line().await.unwrap(), Some("alice".to_string()));
        assert_eq!(reader.next_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn buffers_a_partial_line_across_reads() {
        let (mut client, server) = tokio::io::duplex(64);
        let mut reader = LineReader::new(server);

        client.write_all(b"{\"movi").await.unwrap();
        client.write_all(b"ng\":\"up\"}\n").await.unwrap();

        let line = reader.next_line().await.unwrap();
        assert_eq!(line, Some("{\"moving\":\"up\"}".to_string()));
    }

    #[tokio::test]
    async fn splits_two_lines_from_one_read() {
        let (mut client, server) = tokio::io::duplex(64);
        client.write_all(b"{\"moving\":\"up\"}\n{\"moving\":\"left\"}\n").await.unwrap();

        let mut reader = LineReader::new(server);
        assert_eq!(reader.next_line().await.unwrap(), Some("{\"moving\":\"up\"}".to_string()));
        assert_eq!(reader.next_line().await.unwrap(), Some("{\"moving\":\"left\"}".to_string()));
    }
}
