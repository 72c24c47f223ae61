pub mod bpt;

pub fn init_stats() {
    bpt::init_stats();
}
