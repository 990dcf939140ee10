use chrono::Utc;
use parking_lot::Mutex;

use crate::factory::Error;
use crate::{KeyGenerator, KeyValue};

/// Custom epoch the timestamp field counts from: 2016-11-01T00:00:00Z.
const EPOCH_MILLIS: i64 = 1_477_958_400_000;

/// Bit width of the per-millisecond sequence field.
const SEQUENCE_BITS: u8 = 12;

/// Bit width of the worker id field.
const WORKER_ID_BITS: u8 = 10;

const SEQUENCE_MASK: u16 = (1 << SEQUENCE_BITS) - 1;

/// Largest worker id that fits the 10-bit field.
pub(crate) const MAX_WORKER_ID: u16 = (1 << WORKER_ID_BITS) - 1;

#[derive(Debug, Default)]
struct State {
    last_millis: i64,
    sequence: u16,
}

/// A snowflake-layout key generator.
///
/// Keys pack a 41-bit millisecond timestamp (from a custom epoch), a
/// 10-bit worker id and a 12-bit per-millisecond sequence into an `i64`:
///
/// ```text
/// | 0 | timestamp (41 bits) | worker id (10 bits) | sequence (12 bits) |
/// ```
///
/// Keys from one instance are strictly increasing; instances with
/// distinct worker ids never collide. A sequence overflow within one
/// millisecond spins until the clock advances.
#[derive(Debug)]
pub struct SnowflakeKeyGenerator {
    worker_id: u16,
    state: Mutex<State>,
}

impl SnowflakeKeyGenerator {
    /// Construct a generator for `worker_id`, which must fit the 10-bit
    /// worker id field.
    pub fn new(worker_id: u16) -> Result<Self, Error> {
        if worker_id > MAX_WORKER_ID {
            return Err(Error::WorkerIdOutOfRange {
                worker_id,
                max: MAX_WORKER_ID,
            });
        }
        Ok(Self {
            worker_id,
            state: Mutex::new(State::default()),
        })
    }

    /// The worker id this generator stamps into every key.
    pub fn worker_id(&self) -> u16 {
        self.worker_id
    }

    fn current_millis() -> i64 {
        Utc::now().timestamp_millis() - EPOCH_MILLIS
    }
}

impl KeyGenerator for SnowflakeKeyGenerator {
    fn next_key(&self) -> KeyValue {
        let mut state = self.state.lock();

        // Never step backwards, even if the wall clock does.
        let mut now = Self::current_millis().max(state.last_millis);

        if now == state.last_millis {
            state.sequence = (state.sequence + 1) & SEQUENCE_MASK;
            if state.sequence == 0 {
                // Sequence exhausted for this millisecond.
                while now <= state.last_millis {
                    now = Self::current_millis();
                }
            }
        } else {
            state.sequence = 0;
        }
        state.last_millis = now;

        let key = (now << (WORKER_ID_BITS + SEQUENCE_BITS))
            | i64::from(self.worker_id) << SEQUENCE_BITS
            | i64::from(state.sequence);
        KeyValue::Number(key)
    }
}
