//! Asynchronous CSV reader with batch interface
//!
//! Provides a streaming interface over bet entries from a CSV file.
//! Supports batch reading for efficient async processing.
//!
//! # Design
//!
//! The AsyncReader uses:
//! - csv-async for streaming CSV parsing
//! - tokio for async runtime and concurrency primitives
//! - Batch reading for efficient processing
//!
//! # Architecture
//!
//! ```text
//! CSV Reader → AsyncReader → Batches of BetEntry
//!                  ↓
//!           csv_format module
//!           (BetEntryRecord, convert_bet_record)
//! ```

use crate::core::catalog::Catalog;
use crate::io::csv_format::{convert_bet_record, BetEntryRecord};
use crate::types::BetEntry;
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use tracing::warn;

/// Asynchronous bet entry reader
///
/// Provides a batch reading interface over bet entries.
/// Maintains streaming behavior with constant memory usage per batch.
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    line_num: usize,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    /// Create a new AsyncReader from an async reader
    ///
    /// Whitespace is trimmed from all fields and field counts may vary.
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);
        Self {
            csv_reader,
            line_num: 0,
        }
    }

    /// Read up to `batch_size` valid entries
    ///
    /// Rows that fail to parse or convert are logged and skipped; they do
    /// not count toward the batch size.
    ///
    /// # Returns
    ///
    /// The entries read, in file order. An empty batch means end of file.
    pub async fn read_batch(&mut self, batch_size: usize, catalog: &Catalog) -> Vec<BetEntry> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<BetEntryRecord>();

        while batch.len() < batch_size {
            let Some(item) = records.next().await else {
                break;
            };
            self.line_num += 1;
            let line = self.line_num + 1;
            match item {
                Ok(record) => match convert_bet_record(record, catalog) {
                    Ok(entry) => batch.push(entry),
                    Err(e) => warn!(line, error = %e, "bet entry skipped"),
                },
                Err(e) => warn!(line, error = %e, "CSV parse error"),
            }
        }

        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::fixtures::catalog;
    use crate::types::StationTarget;
    use futures::io::Cursor;
    use rust_decimal::Decimal;

    const HEADER: &str = "id,draw_date,station,numbers,bet_type,amount\n";

    fn reader(rows: &str) -> AsyncReader<Cursor<Vec<u8>>> {
        AsyncReader::new(Cursor::new(format!("{}{}", HEADER, rows).into_bytes()))
    }

    #[tokio::test]
    async fn test_async_reader_read_batch() {
        let catalog = catalog();
        let mut reader = reader(
            "1,2024-01-05,vl,25,dd,10\n\
             2,2024-01-05,ct,36,dd,5\n\
             3,2024-01-05,mb,47,b,1\n",
        );

        let batch = reader.read_batch(2, &catalog).await;
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].id, 1);
        assert_eq!(batch[1].target, StationTarget::Single(3));

        let batch = reader.read_batch(2, &catalog).await;
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].id, 3);

        assert!(reader.read_batch(2, &catalog).await.is_empty());
    }

    #[tokio::test]
    async fn test_async_reader_empty_csv() {
        let catalog = catalog();
        let mut reader = reader("");
        assert!(reader.read_batch(10, &catalog).await.is_empty());
    }

    #[tokio::test]
    async fn test_async_reader_skips_invalid_records() {
        let catalog = catalog();
        let mut reader = reader(
            "1,2024-01-05,zz,25,dd,10\n\
             x,2024-01-05,vl,25,dd,10\n\
             3,2024-01-05,vl,25,dd,2.5\n",
        );
        let batch = reader.read_batch(10, &catalog).await;
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].id, 3);
        assert_eq!(batch[0].amount, Decimal::new(25, 1));
    }

    #[tokio::test]
    async fn test_async_reader_whitespace_handling() {
        let catalog = catalog();
        let mut reader = reader("  1 , 2024-01-05 ,  vl ,  25.36 , DD ,  10  \n");
        let batch = reader.read_batch(10, &catalog).await;
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].numbers, vec!["25", "36"]);
        assert_eq!(batch[0].bet_type, "dd");
    }
}
