use lazy_static::lazy_static;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::io::Write;

type StatsCallbackFn = Box<dyn Fn(&mut StatsAccumulator) + Send>;

lazy_static! {
    static ref FUNCS: Mutex<Vec<StatsCallbackFn>> = Mutex::new(Vec::new());
    static ref STATS_ACCUMULATOR: Mutex<StatsAccumulator> = Mutex::new(StatsAccumulator::new());
}

#[macro_export]
macro_rules! stat_counter {
    ($title:expr, $f:ident) => {

        mod $f {
            use $crate::core::stats::{StatsRegisterer, StatsAccumulator};
            use std::sync::atomic::{AtomicU64, Ordering};
            use std::sync::Once;

            static VALUE: AtomicU64 = AtomicU64::new(0);
            static REGISTER: Once = Once::new();

            pub fn init() {
                REGISTER.call_once(|| StatsRegisterer::register(report));
            }

            pub fn inc() {
                VALUE.fetch_add(1, Ordering::Relaxed);
            }

            #[allow(dead_code)]
            pub fn get() -> u64 {
                VALUE.load(Ordering::Relaxed)
            }

            fn report(accum: &mut StatsAccumulator) {
                accum.report_counter($title, VALUE.swap(0, Ordering::Relaxed));
            }
        }

    }
}

#[macro_export]
macro_rules! stat_int_distribution {
    ($title:expr, $f:ident) => {
        mod $f {
            use $crate::core::stats::{StatsRegisterer, StatsAccumulator};
            use std::sync::atomic::{AtomicU64, Ordering};
            use std::sync::Once;

            static SUM: AtomicU64 = AtomicU64::new(0);
            static COUNT: AtomicU64 = AtomicU64::new(0);
            static MIN: AtomicU64 = AtomicU64::new(u64::MAX);
            static MAX: AtomicU64 = AtomicU64::new(0);
            static REGISTER: Once = Once::new();

            pub fn init() {
                REGISTER.call_once(|| StatsRegisterer::register(report));
            }

            fn report(accum: &mut StatsAccumulator) {
                accum.report_int_distribution(
                    $title,
                    SUM.swap(0, Ordering::Relaxed),
                    COUNT.swap(0, Ordering::Relaxed),
                    MIN.swap(u64::MAX, Ordering::Relaxed),
                    MAX.swap(0, Ordering::Relaxed)
                );
            }

            pub fn report_value(value: u64) {
                SUM.fetch_add(value, Ordering::Relaxed);
                COUNT.fetch_add(1, Ordering::Relaxed);
                MIN.fetch_min(value, Ordering::Relaxed);
                MAX.fetch_max(value, Ordering::Relaxed);
            }
        }
    }
}

#[macro_export]
macro_rules! stat_percent {
    ($title:expr, $f:ident) => {

        mod $f {
            use $crate::core::stats::{StatsRegisterer, StatsAccumulator};
            use std::sync::atomic::{AtomicU64, Ordering};
            use std::sync::Once;

            static NUM: AtomicU64 = AtomicU64::new(0);
            static DENOM: AtomicU64 = AtomicU64::new(0);
            static REGISTER: Once = Once::new();

            pub fn inc_num() {
                NUM.fetch_add(1, Ordering::Relaxed);
            }

            pub fn inc_den() {
                DENOM.fetch_add(1, Ordering::Relaxed);
            }

            pub fn init() {
                REGISTER.call_once(|| StatsRegisterer::register(report));
            }

            fn report(accum: &mut StatsAccumulator) {
                accum.report_percentage(
                    $title,
                    NUM.swap(0, Ordering::Relaxed),
                    DENOM.swap(0, Ordering::Relaxed));
            }
        }
    }
}

pub struct StatsRegisterer();

impl StatsRegisterer {
    pub fn register<F: 'static + Fn(&mut StatsAccumulator) + Send>(func: F) {
        FUNCS.lock().push(Box::new(func));
    }

    pub fn call_callbacks(accum: &mut StatsAccumulator) {
        for func in FUNCS.lock().iter() {
            func(accum)
        }
    }
}

#[derive(Default)]
pub struct StatsAccumulator {
    counters                    : BTreeMap<String, u64>,
    int_distribution_sums       : BTreeMap<String, u64>,
    int_distribution_counts     : BTreeMap<String, u64>,
    int_distribution_mins       : BTreeMap<String, u64>,
    int_distribution_maxs       : BTreeMap<String, u64>,
    percentages                 : BTreeMap<String, (u64, u64)>
}

impl StatsAccumulator {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn report_counter(&mut self, name: &str, val: u64) {
        *self.counters.entry(name.to_owned()).or_insert(0) += val;
    }

    pub fn report_int_distribution(&mut self, name: &str, sum: u64, count: u64, min: u64, max: u64) {
        *self.int_distribution_sums.entry(name.to_owned()).or_insert(0) += sum;
        *self.int_distribution_counts.entry(name.to_owned()).or_insert(0) += count;

        let mn = self.int_distribution_mins.entry(name.to_owned()).or_insert(min);
        *mn = u64::min(*mn, min);

        let mx = self.int_distribution_maxs.entry(name.to_owned()).or_insert(max);
        *mx = u64::max(*mx, max);
    }

    pub fn report_percentage(&mut self, name: &str, num: u64, denom: u64) {
        let perc = self.percentages.entry(name.to_owned()).or_insert((0, 0));

        *perc = (perc.0 + num, perc.1 + denom);
    }

    pub fn counter(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    pub fn clear(&mut self) {
        self.counters.clear();
        self.int_distribution_sums.clear();
        self.int_distribution_counts.clear();
        self.int_distribution_mins.clear();
        self.int_distribution_maxs.clear();
        self.percentages.clear();
    }

    pub fn print<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        let mut categories: BTreeMap<&str, Vec<String>> = BTreeMap::new();

        for (name, v) in &self.counters {
            if *v == 0 { continue; }
            let (cat, title) = split_title(name);
            categories.entry(cat).or_default().push(format!("{:<42}{:>12}", title, v));
        }

        for (name, count) in &self.int_distribution_counts {
            if *count == 0 { continue; }
            let (cat, title) = split_title(name);
            let sum = self.int_distribution_sums.get(name).copied().unwrap_or(0);
            let min = self.int_distribution_mins.get(name).copied().unwrap_or(0);
            let max = self.int_distribution_maxs.get(name).copied().unwrap_or(0);
            categories.entry(cat).or_default().push(format!(
                "{:<42}{:.3} avg [range {} - {}]",
                title, sum as f64 / *count as f64, min, max));
        }

        for (name, (num, denom)) in &self.percentages {
            if *denom == 0 { continue; }
            let (cat, title) = split_title(name);
            categories.entry(cat).or_default().push(format!(
                "{:<42}{:>12} / {:>12} ({:.2}%)",
                title, num, denom, 100.0 * *num as f64 / *denom as f64));
        }

        writeln!(writer, "Statistics:")?;
        for (cat, lines) in categories {
            writeln!(writer, "  {}", cat)?;
            for line in lines {
                writeln!(writer, "    {}", line)?;
            }
        }

        Ok(())
    }
}

fn split_title(name: &str) -> (&str, &str) {
    match name.find('/') {
        Some(i) => (&name[..i], &name[i + 1..]),
        None    => ("", name)
    }
}

/// Folds every registered counter into the global accumulator and resets
/// the counters.
pub fn report_stats() {
    let mut acc = STATS_ACCUMULATOR.lock();

    StatsRegisterer::call_callbacks(&mut acc);
}

pub fn print_stats<W: Write>(writer: W) -> std::io::Result<()> {
    STATS_ACCUMULATOR.lock().print(writer)
}

pub fn clear_stats() {
    STATS_ACCUMULATOR.lock().clear();
}
