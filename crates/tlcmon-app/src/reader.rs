//! Line reader - turns TLC output into stream events

use tlcmon_core::prelude::*;
use tlcmon_core::TlcEvent;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;

/// Read lines from `reader` and send them as [`TlcEvent::Line`]
///
/// Bytes that are not valid UTF-8 are replaced rather than ending the
/// stream, and `\r\n` endings are stripped. Always ends with
/// [`TlcEvent::Closed`], also after a read error, so the driver can finalize
/// the run. Returns the number of lines sent.
pub async fn read_lines<R>(reader: R, tx: mpsc::Sender<TlcEvent>) -> Result<usize>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    let mut count = 0usize;

    let outcome = loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break Ok(count),
            Ok(_) => {
                let line = decode_line(&buf);
                trace!("tlc: {}", line);
                if tx.send(TlcEvent::Line(line)).await.is_err() {
                    debug!("line channel closed after {} lines", count);
                    return Err(Error::ChannelClosed);
                }
                count += 1;
            }
            Err(e) => {
                break Err::<usize, _>(e)
                    .with_context(|| format!("Reading TLC output failed after {count} lines"));
            }
        }
    };

    if tx.send(TlcEvent::Closed).await.is_err() {
        debug!("line channel closed before end of stream");
    }

    info!("TLC output reader finished after {} lines", count);
    outcome
}

/// One raw line without its terminator, lossily decoded
fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    let line = String::from_utf8_lossy(raw);
    if let std::borrow::Cow::Owned(_) = &line {
        debug!("Replaced invalid UTF-8 in TLC output line");
    }
    line.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::io::Builder;

    async fn collect(mut rx: mpsc::Receiver<TlcEvent>) -> Vec<TlcEvent> {
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn test_lines_then_closed() {
        let reader = Builder::new()
            .read(b"@!@!@STARTMSG 2185:0 @!@!@\r\n")
            .read(b"Starting... (2024-01-01 10:00:00)\n@!@!@ENDMSG 2185 @!@!@")
            .build();
        let (tx, rx) = mpsc::channel(16);

        let count = read_lines(reader, tx).await.unwrap();

        assert_eq!(count, 3);
        assert_eq!(
            collect(rx).await,
            vec![
                TlcEvent::line("@!@!@STARTMSG 2185:0 @!@!@"),
                TlcEvent::line("Starting... (2024-01-01 10:00:00)"),
                TlcEvent::line("@!@!@ENDMSG 2185 @!@!@"),
                TlcEvent::Closed,
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_input_still_closes() {
        let reader = Builder::new().build();
        let (tx, rx) = mpsc::channel(4);

        assert_eq!(read_lines(reader, tx).await.unwrap(), 0);
        assert_eq!(collect(rx).await, vec![TlcEvent::Closed]);
    }

    #[tokio::test]
    async fn test_read_error_closes_and_reports() {
        let reader = Builder::new()
            .read(b"first\n")
            .read_error(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone"))
            .build();
        let (tx, rx) = mpsc::channel(4);

        let result = read_lines(reader, tx).await;

        assert!(matches!(result, Err(Error::Io(_))));
        assert_eq!(
            collect(rx).await,
            vec![TlcEvent::line("first"), TlcEvent::Closed]
        );
    }

    #[tokio::test]
    async fn test_dropped_receiver_stops_reading() {
        let reader = Builder::new().read(b"a\nb\n").build();
        let (tx, rx) = mpsc::channel(1);
        drop(rx);

        let result = read_lines(reader, tx).await;

        assert!(matches!(result, Err(Error::ChannelClosed)));
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_does_not_end_stream() {
        let reader = Builder::new()
            .read(b"caf\xe9 latin-1 output\n")
            .read(b"@!@!@STARTMSG 2186:0 @!@!@\n")
            .read(b"Finished in 4012ms at (2024-01-01 10:00:04)\n")
            .read(b"@!@!@ENDMSG 2186 @!@!@\n")
            .build();
        let (tx, rx) = mpsc::channel(16);

        assert_eq!(read_lines(reader, tx).await.unwrap(), 4);

        let events = collect(rx).await;
        assert_eq!(events[0], TlcEvent::line("caf\u{FFFD} latin-1 output"));
        assert_eq!(events[3], TlcEvent::line("@!@!@ENDMSG 2186 @!@!@"));
        assert_eq!(events[4], TlcEvent::Closed);
    }

    #[test]
    fn test_decode_line_strips_terminators() {
        assert_eq!(decode_line(b"a\r\n"), "a");
        assert_eq!(decode_line(b"b\n"), "b");
        assert_eq!(decode_line(b"c"), "c");
        assert_eq!(decode_line(b"\r\n"), "");
    }
}
