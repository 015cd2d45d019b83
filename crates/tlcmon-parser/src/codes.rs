//! TLC `-tool` message codes
//!
//! Every framed message starts with `@!@!@STARTMSG <code>:<class> @!@!@`.
//! Only the codes the result builder reacts to are listed here.

/// No open message
pub const NONE: i32 = -1;
/// Start marker whose payload did not parse as an integer
pub const UNKNOWN: i32 = -2;

pub const GENERAL: i32 = 1000;
pub const TLC_MODE_MC: i32 = 2187;
pub const TLC_SANY_START: i32 = 2220;
pub const TLC_SANY_END: i32 = 2219;
pub const TLC_CHECKPOINT_START: i32 = 2195;
pub const TLC_STARTING: i32 = 2185;
pub const TLC_COMPUTING_INIT: i32 = 2189;
pub const TLC_COMPUTING_INIT_PROGRESS: i32 = 2269;
pub const TLC_INIT_GENERATED1: i32 = 2190;
pub const TLC_INIT_GENERATED2: i32 = 2191;
pub const TLC_INIT_GENERATED3: i32 = 2207;
pub const TLC_INIT_GENERATED4: i32 = 2208;
pub const TLC_CHECKING_TEMPORAL_PROPS: i32 = 2192;
pub const TLC_DISTRIBUTED_SERVER_RUNNING: i32 = 7000;
pub const TLC_DISTRIBUTED_WORKER_REGISTERED: i32 = 7001;
pub const TLC_DISTRIBUTED_WORKER_DEREGISTERED: i32 = 7002;
pub const TLC_COVERAGE_NEXT: i32 = 2772;
pub const TLC_COVERAGE_INIT: i32 = 2773;
pub const TLC_PROGRESS_STATS: i32 = 2200;
pub const TLC_TEMPORAL_PROPERTY_VIOLATED: i32 = 2116;
pub const TLC_INITIAL_STATE: i32 = 2102;
pub const TLC_NESTED_EXPRESSION: i32 = 2103;
pub const TLC_VALUE_ASSERT_FAILED: i32 = 2132;
pub const TLC_STATE_PRINT1: i32 = 2216;
pub const TLC_STATE_PRINT2: i32 = 2217;
pub const TLC_STATE_PRINT3: i32 = 2218;
pub const TLC_FINISHED: i32 = 2186;
pub const TLC_SUCCESS: i32 = 2193;
