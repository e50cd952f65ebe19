mod message_query;
mod message_record;

pub use message_query::MessageQuery;
pub use message_record::MessageRecord;
