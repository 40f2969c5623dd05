macro_rules! user_text_table {
    () => {
        "user_text"
    };
}

pub const CREATE_USER_TEXT_TABLE: &str = concat!(
    "CREATE TABLE IF NOT EXISTS ",
    user_text_table!(),
    " (",
    "id TEXT PRIMARY KEY,",
    "text TEXT,",
    "word_count INT",
    ");"
);

/// Re-delivered messages carry the same id; the conflict makes them a no-op.
pub const INSERT_USER_TEXT: &str = concat!(
    "INSERT INTO ",
    user_text_table!(),
    " (id, text, word_count) ",
    "VALUES ($1, $2, $3) ",
    "ON CONFLICT (id) DO NOTHING"
);

pub const SELECT_USER_TEXT: &str = concat!(
    "SELECT id, text, word_count FROM ",
    user_text_table!(),
    " WHERE id = $1"
);
