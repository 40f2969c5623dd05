pub mod create_tables;
pub mod init_pg_pool;
pub mod insert_data;
pub mod sqls;

pub use create_tables::ensure_schema_ready;
pub use init_pg_pool::connect_with_retry;
pub use insert_data::{upsert_record, PgUserTextStore, UpsertOutcome, UserTextStore};
pub use sqls::*;
