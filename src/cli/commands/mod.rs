mod check;
mod compute;
mod init;
mod lookup;

pub use check::cmd_check;
pub use compute::cmd_compute;
pub use init::cmd_init;
pub use lookup::cmd_lookup;
