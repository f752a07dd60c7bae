// SPDX-FileCopyrightText: 2025 The vrt49 Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
Leap-second accounting for the multi-epoch [`Timestamp`] type.

The table is either compiled in (equivalent to the 1961-2015 content of
the USNO `tai-utc.dat` file) or loaded from a file in that format. UTC
seconds in this crate count leap seconds; POSIX seconds do not.

[`Timestamp`]: crate::Timestamp
*/

use std::fs;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use crate::VitaError;

/// Rows of the pre-1972 fractional-offset table.
const PRE_1972_LENGTH: usize = 13;

/// Day-in-month map. `DIM[month-1]` is the day-of-year on which the
/// month starts (0-based); the second half of the table covers leap
/// years.
const DIM: [i32; 24] = [
    0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334, //
    0, 31, 60, 91, 121, 152, 182, 213, 244, 274, 305, 335,
];

/// Pre-1972 fractional TAI-UTC rows: start date (Midas seconds),
/// constant, offset, scale.
const PRE_1972: [(f64, f64, f64, f64); PRE_1972_LENGTH] = [
    (-3287.0 * 86400.0, 1.422818, 3.471552e8, 0.001296),
    (-3075.0 * 86400.0, 1.372818, 3.471552e8, 0.001296),
    (-2922.0 * 86400.0, 1.845858, 3.786912e8, 0.0011232),
    (-2253.0 * 86400.0, 1.945858, 3.786912e8, 0.0011232),
    (-2192.0 * 86400.0, 3.24013, 4.733856e8, 0.001296),
    (-2101.0 * 86400.0, 3.34013, 4.733856e8, 0.001296),
    (-1948.0 * 86400.0, 3.44013, 4.733856e8, 0.001296),
    (-1826.0 * 86400.0, 3.54013, 4.733856e8, 0.001296),
    (-1767.0 * 86400.0, 3.64013, 4.733856e8, 0.001296),
    (-1645.0 * 86400.0, 3.74013, 4.733856e8, 0.001296),
    (-1583.0 * 86400.0, 3.84013, 4.733856e8, 0.001296),
    (-1461.0 * 86400.0, 4.31317, 5.049216e8, 0.002592),
    (-700.0 * 86400.0, 4.21317, 5.049216e8, 0.002592),
];

/// Cumulative TAI-UTC at 1970-01-01 (the table's leap counts are
/// relative to this).
const UTC2TAI_LS_1970: i32 = 8;

/// Delta between the J1950 (Midas) and J1970 (POSIX) epochs.
const MIDAS2POSIX: i64 = 631_152_000;

/// The first lines that should appear in a `tai-utc.dat` file. This
/// doubles as the compiled-in default table and as a sanity check for
/// the accuracy of a loaded file.
#[rustfmt::skip]
const FIRST_LINES: [&str; 40] = [
    " 1961 JAN  1 =JD 2437300.5  TAI-UTC=   1.4228180 S + (MJD - 37300.) X 0.001296 S",
    " 1961 AUG  1 =JD 2437512.5  TAI-UTC=   1.3728180 S + (MJD - 37300.) X 0.001296 S",
    " 1962 JAN  1 =JD 2437665.5  TAI-UTC=   1.8458580 S + (MJD - 37665.) X 0.0011232S",
    " 1963 NOV  1 =JD 2438334.5  TAI-UTC=   1.9458580 S + (MJD - 37665.) X 0.0011232S",
    " 1964 JAN  1 =JD 2438395.5  TAI-UTC=   3.2401300 S + (MJD - 38761.) X 0.001296 S",
    " 1964 APR  1 =JD 2438486.5  TAI-UTC=   3.3401300 S + (MJD - 38761.) X 0.001296 S",
    " 1964 SEP  1 =JD 2438639.5  TAI-UTC=   3.4401300 S + (MJD - 38761.) X 0.001296 S",
    " 1965 JAN  1 =JD 2438761.5  TAI-UTC=   3.5401300 S + (MJD - 38761.) X 0.001296 S",
    " 1965 MAR  1 =JD 2438820.5  TAI-UTC=   3.6401300 S + (MJD - 38761.) X 0.001296 S",
    " 1965 JUL  1 =JD 2438942.5  TAI-UTC=   3.7401300 S + (MJD - 38761.) X 0.001296 S",
    " 1965 SEP  1 =JD 2439004.5  TAI-UTC=   3.8401300 S + (MJD - 38761.) X 0.001296 S",
    " 1966 JAN  1 =JD 2439126.5  TAI-UTC=   4.3131700 S + (MJD - 39126.) X 0.002592 S",
    " 1968 FEB  1 =JD 2439887.5  TAI-UTC=   4.2131700 S + (MJD - 39126.) X 0.002592 S",
    " 1972 JAN  1 =JD 2441317.5  TAI-UTC=  10.0       S + (MJD - 41317.) X 0.0      S",
    " 1972 JUL  1 =JD 2441499.5  TAI-UTC=  11.0       S + (MJD - 41317.) X 0.0      S",
    " 1973 JAN  1 =JD 2441683.5  TAI-UTC=  12.0       S + (MJD - 41317.) X 0.0      S",
    " 1974 JAN  1 =JD 2442048.5  TAI-UTC=  13.0       S + (MJD - 41317.) X 0.0      S",
    " 1975 JAN  1 =JD 2442413.5  TAI-UTC=  14.0       S + (MJD - 41317.) X 0.0      S",
    " 1976 JAN  1 =JD 2442778.5  TAI-UTC=  15.0       S + (MJD - 41317.) X 0.0      S",
    " 1977 JAN  1 =JD 2443144.5  TAI-UTC=  16.0       S + (MJD - 41317.) X 0.0      S",
    " 1978 JAN  1 =JD 2443509.5  TAI-UTC=  17.0       S + (MJD - 41317.) X 0.0      S",
    " 1979 JAN  1 =JD 2443874.5  TAI-UTC=  18.0       S + (MJD - 41317.) X 0.0      S",
    " 1980 JAN  1 =JD 2444239.5  TAI-UTC=  19.0       S + (MJD - 41317.) X 0.0      S",
    " 1981 JUL  1 =JD 2444786.5  TAI-UTC=  20.0       S + (MJD - 41317.) X 0.0      S",
    " 1982 JUL  1 =JD 2445151.5  TAI-UTC=  21.0       S + (MJD - 41317.) X 0.0      S",
    " 1983 JUL  1 =JD 2445516.5  TAI-UTC=  22.0       S + (MJD - 41317.) X 0.0      S",
    " 1985 JUL  1 =JD 2446247.5  TAI-UTC=  23.0       S + (MJD - 41317.) X 0.0      S",
    " 1988 JAN  1 =JD 2447161.5  TAI-UTC=  24.0       S + (MJD - 41317.) X 0.0      S",
    " 1990 JAN  1 =JD 2447892.5  TAI-UTC=  25.0       S + (MJD - 41317.) X 0.0      S",
    " 1991 JAN  1 =JD 2448257.5  TAI-UTC=  26.0       S + (MJD - 41317.) X 0.0      S",
    " 1992 JUL  1 =JD 2448804.5  TAI-UTC=  27.0       S + (MJD - 41317.) X 0.0      S",
    " 1993 JUL  1 =JD 2449169.5  TAI-UTC=  28.0       S + (MJD - 41317.) X 0.0      S",
    " 1994 JUL  1 =JD 2449534.5  TAI-UTC=  29.0       S + (MJD - 41317.) X 0.0      S",
    " 1996 JAN  1 =JD 2450083.5  TAI-UTC=  30.0       S + (MJD - 41317.) X 0.0      S",
    " 1997 JUL  1 =JD 2450630.5  TAI-UTC=  31.0       S + (MJD - 41317.) X 0.0      S",
    " 1999 JAN  1 =JD 2451179.5  TAI-UTC=  32.0       S + (MJD - 41317.) X 0.0      S",
    " 2006 JAN  1 =JD 2453736.5  TAI-UTC=  33.0       S + (MJD - 41317.) X 0.0      S",
    " 2009 JAN  1 =JD 2454832.5  TAI-UTC=  34.0       S + (MJD - 41317.) X 0.0      S",
    " 2012 JUL  1 =JD 2456109.5  TAI-UTC=  35.0       S + (MJD - 41317.) X 0.0      S",
    " 2015 JUL  1 =JD 2457204.5  TAI-UTC=  36.0       S + (MJD - 41317.) X 0.0      S",
];

/// Returns true for Gregorian leap years.
pub(crate) fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Leap-second table: parallel POSIX/UTC insertion dates with the
/// cumulative count of post-1970 integer leap seconds, plus derived
/// year-start markers for 1972..=2106.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeapSeconds {
    start_date_posix: Vec<i64>,
    start_date_utc: Vec<i64>,
    leap_seconds: Vec<i32>,
    year_start_posix: Vec<i64>,
    year_start_utc: Vec<i64>,
}

impl LeapSeconds {
    /// Days from 1970-01-01 to the given date.
    pub fn ymd_to_posix_day(year: i32, month: i32, day: i32) -> i32 {
        let dim = if is_leap_year(year) {
            DIM[(month - 1 + 12) as usize]
        } else {
            DIM[(month - 1) as usize]
        };
        (year - 1950) * 365 + (year + 3) / 4 - 7793 + (day + dim - 1)
    }

    /// Days from 1980-01-06 to the given date. Identical to the POSIX
    /// version except using 11450 rather than 7793 to account for the
    /// additional 3657 days between 1 Jan 1970 and 6 Jan 1980.
    pub(crate) fn ymd_to_gps_day(year: i32, month: i32, day: i32) -> i32 {
        let dim = if is_leap_year(year) {
            DIM[(month - 1 + 12) as usize]
        } else {
            DIM[(month - 1) as usize]
        };
        (year - 1950) * 365 + (year + 3) / 4 - 11450 + (day + dim - 1)
    }

    fn new(start_posix: Vec<i64>, leaps: Vec<i32>) -> LeapSeconds {
        let start_date_utc = start_posix
            .iter()
            .zip(&leaps)
            .map(|(p, l)| p + *l as i64)
            .collect();
        let mut ls = LeapSeconds {
            start_date_posix: start_posix,
            start_date_utc,
            leap_seconds: leaps,
            // Other parts of the time model break in 2106, so the year
            // tables stop there.
            year_start_posix: Vec::with_capacity(2106 - 1972),
            year_start_utc: Vec::with_capacity(2106 - 1972),
        };
        let mut posix: i64 = 365 * 2 * 86_400; // start of 1972
        for year in 1972..2106 {
            ls.year_start_posix.push(posix);
            ls.year_start_utc
                .push(posix + ls.leap_seconds_posix(posix).unwrap_or(0) as i64);
            posix += if is_leap_year(year) { 366 * 86_400 } else { 365 * 86_400 };
        }
        ls
    }

    /// Builds a table from lines in the USNO `tai-utc.dat` format. The
    /// first 40 lines must match the known 1961-2015 content; later
    /// lines extend the table.
    pub fn from_lines(lines: &[&str]) -> Result<LeapSeconds, VitaError> {
        let lines: Vec<&str> = lines.iter().map(|l| l.trim_end()).filter(|l| !l.is_empty()).collect();
        if lines.len() < FIRST_LINES.len() {
            return Err(VitaError::InvalidLeapSecondsFile("<lines>".into()));
        }
        let mut start_posix = Vec::with_capacity(lines.len() - PRE_1972_LENGTH);
        let mut leaps = Vec::with_capacity(lines.len() - PRE_1972_LENGTH);
        for (i, line) in lines.iter().enumerate() {
            if i < FIRST_LINES.len() && *line != FIRST_LINES[i] {
                return Err(VitaError::InvalidLeapSecondsFile("<lines>".into()));
            }
            if i < PRE_1972_LENGTH {
                continue;
            }
            let bad = || VitaError::InvalidLeapSecondsFile("<lines>".into());
            if line.len() < 40 {
                return Err(bad());
            }
            let year: i32 = line[1..5].trim().parse().map_err(|_| bad())?;
            let month = match &line[6..9] {
                "JAN" => 1, "FEB" => 2, "MAR" => 3, "APR" => 4,
                "MAY" => 5, "JUN" => 6, "JUL" => 7, "AUG" => 8,
                "SEP" => 9, "OCT" => 10, "NOV" => 11, "DEC" => 12,
                _ => return Err(bad()),
            };
            let day: i32 = line[10..12].trim().parse().map_err(|_| bad())?;
            let tai_utc: i32 = line[38..40].trim().parse().map_err(|_| bad())?;

            start_posix.push(Self::ymd_to_posix_day(year, month, day) as i64 * 86_400);
            leaps.push(tai_utc - UTC2TAI_LS_1970);
        }
        Ok(LeapSeconds::new(start_posix, leaps))
    }

    /// Builds the compiled-in default table (1961-2015 content).
    pub fn builtin() -> LeapSeconds {
        LeapSeconds::from_lines(&FIRST_LINES).expect("built-in table is valid")
    }

    /// Loads a table from a `tai-utc.dat` file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<LeapSeconds, VitaError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let lines: Vec<&str> = text.lines().collect();
        LeapSeconds::from_lines(&lines).map_err(|e| match e {
            VitaError::InvalidLeapSecondsFile(_) => {
                VitaError::InvalidLeapSecondsFile(path.display().to_string())
            }
            other => other,
        })
    }

    /// Shared process-wide default table (compiled-in content). The
    /// constructors on [`Timestamp`](crate::Timestamp) take an explicit
    /// table; this is the convenience used by the `*_default` variants.
    pub fn default_instance() -> Arc<LeapSeconds> {
        static INSTANCE: OnceLock<Arc<LeapSeconds>> = OnceLock::new();
        INSTANCE.get_or_init(|| Arc::new(LeapSeconds::builtin())).clone()
    }

    /// Index of the last table entry at or before `t` in `dates`.
    fn lookup(dates: &[i64], t: i64) -> Option<usize> {
        let idx = dates.partition_point(|&d| d <= t);
        idx.checked_sub(1)
    }

    /// Cumulative post-1970 leap seconds in effect at a UTC second
    /// count (leap seconds included in the count).
    pub fn leap_seconds_utc(&self, utc: i64) -> Result<i32, VitaError> {
        if utc > u32::MAX as i64 {
            return Err(VitaError::TimeOverflow);
        }
        if utc == 0 {
            // date not yet initialized, treat as 1970-01-01T00:00:00
            return Ok(0);
        }
        match Self::lookup(&self.start_date_utc, utc) {
            Some(i) => Ok(self.leap_seconds[i]),
            None => Err(VitaError::TimeBeforeTable(1972)),
        }
    }

    /// Cumulative post-1970 leap seconds in effect at a POSIX second
    /// count.
    pub fn leap_seconds_posix(&self, posix: i64) -> Result<i32, VitaError> {
        if posix > u32::MAX as i64 {
            return Err(VitaError::TimeOverflow);
        }
        if posix == 0 {
            return Ok(0);
        }
        match Self::lookup(&self.start_date_posix, posix) {
            Some(i) => Ok(self.leap_seconds[i]),
            None => Err(VitaError::TimeBeforeTable(1972)),
        }
    }

    /// Cumulative leap seconds in effect just *before* the given POSIX
    /// second. Differs from [`leap_seconds_posix`] only at an insertion
    /// instant, where the pre-insertion count is returned. POSIX-to-UTC
    /// conversion uses this so the second following a leap second maps
    /// onto the inserted second's UTC count (the two are
    /// indistinguishable on the POSIX axis).
    ///
    /// [`leap_seconds_posix`]: LeapSeconds::leap_seconds_posix
    pub fn leap_seconds_posix_before(&self, posix: i64) -> Result<i32, VitaError> {
        if posix <= self.start_date_posix[0] {
            // At or before the table start there is nothing earlier to
            // look at; keep the plain lookup (and its range errors).
            return self.leap_seconds_posix(posix);
        }
        self.leap_seconds_posix(posix - 1)
    }

    /// Fractional TAI-UTC offset for a Midas (J1950) time. Post-1972
    /// this is the integer table value; 1961-1972 uses the polynomial
    /// table.
    pub fn leap_seconds_fractional(&self, wsec: f64, fsec: f64) -> Result<f64, VitaError> {
        let posix = (wsec as i64).saturating_sub(MIDAS2POSIX);
        if posix >= self.start_date_posix[0] {
            return Ok(self.leap_seconds_posix(posix)? as f64);
        }
        if posix == 0 {
            return Ok(0.0); // common special-case where time is zero
        }
        for &(start, constant, offset, scale) in PRE_1972.iter().rev() {
            if start > wsec {
                continue;
            }
            // The trailing -8.000082 is an empirical offset carried
            // over from the reference table; it aligns the polynomial
            // rows with the post-1972 integer counts.
            return Ok(constant + (wsec + fsec - offset) * (scale / 86400.0) - 8.000082);
        }
        Err(VitaError::TimeBeforeTable(1961))
    }

    /// Returns true if the given UTC second count lands on an inserted
    /// leap second (i.e. renders as 23:59:60).
    pub fn is_leap_second(&self, utc: i64) -> Result<bool, VitaError> {
        if utc > u32::MAX as i64 {
            return Err(VitaError::TimeOverflow);
        }
        let last = *self.start_date_utc.last().unwrap();
        if utc == 0 || utc >= last {
            return Ok(false);
        }
        if utc < self.start_date_utc[0] {
            return Err(VitaError::TimeBeforeTable(1972));
        }
        Ok(self.start_date_utc.binary_search(&(utc + 1)).is_ok())
    }

    /// Calendar year containing the given UTC second count.
    pub fn year(&self, utc: i64) -> Result<i32, VitaError> {
        if utc == 0 {
            return Ok(1970);
        }
        if utc > u32::MAX as i64 {
            return Err(VitaError::TimeOverflow);
        }
        match Self::lookup(&self.year_start_utc, utc) {
            Some(i) => Ok(1972 + i as i32),
            None => Err(VitaError::TimeBeforeTable(1972)),
        }
    }

    /// Calendar month (1..=12) containing the given UTC second count.
    pub fn month(&self, year: i32, utc: i64) -> Result<i32, VitaError> {
        if utc == 0 {
            return Ok(1);
        }
        for mon in 2..=12 {
            if utc < self.start_of_month_utc(year, mon)? {
                return Ok(mon - 1);
            }
        }
        Ok(12)
    }

    /// UTC second count at the start of the given month.
    pub fn start_of_month_utc(&self, year: i32, month: i32) -> Result<i64, VitaError> {
        let posix = Self::ymd_to_posix_day(year, month, 1) as i64 * 86_400;
        Ok(posix + self.leap_seconds_posix(posix)? as i64)
    }

    /// UTC second count at the start of the given year (1972..=2106).
    pub fn start_of_year_utc(&self, year: i32) -> Result<i64, VitaError> {
        if year < 1972 {
            return Err(VitaError::TimeBeforeTable(1972));
        }
        self.year_start_utc
            .get((year - 1972) as usize)
            .copied()
            .ok_or(VitaError::TimeOverflow)
    }

    /// POSIX second count at the start of the given year (1972..=2106).
    pub fn start_of_year_posix(&self, year: i32) -> Result<i64, VitaError> {
        if year < 1972 {
            return Err(VitaError::TimeBeforeTable(1972));
        }
        self.year_start_posix
            .get((year - 1972) as usize)
            .copied()
            .ok_or(VitaError::TimeOverflow)
    }

    /// Renders a UTC second count (plus optional picoseconds) as an
    /// RFC 3339 string. Leap seconds render as 23:59:60.
    pub fn to_string_utc(&self, seconds: i64, picoseconds: Option<u64>) -> Result<String, VitaError> {
        let year = self.year(seconds)?;
        let month = self.month(year, seconds)?;
        let mut sec = seconds - self.start_of_month_utc(year, month)?;
        if self.is_leap_second(seconds)? {
            let day = (sec - 1) / 86_400 + 1;
            return Ok(Self::render(year, month, day as i32, 23, 59, 60, picoseconds));
        }
        let day = sec / 86_400 + 1;
        sec -= (day - 1) * 86_400;
        let hour = sec / 3_600;
        sec -= hour * 3_600;
        let min = sec / 60;
        sec -= min * 60;
        Ok(Self::render(
            year,
            month,
            day as i32,
            hour as i32,
            min as i32,
            sec as i32,
            picoseconds,
        ))
    }

    /// Renders a GPS second count (plus optional picoseconds) as an
    /// RFC 3339 string. GPS time has no leap seconds, so this is pure
    /// integer math.
    pub fn to_string_gps(seconds: i64, picoseconds: Option<u64>) -> String {
        let mut sec = (seconds % 86_400) as i32;
        let hour = sec / 3_600;
        sec -= hour * 3_600;
        let min = sec / 60;
        sec -= min * 60;

        // There are 1461 days in every 4-year period. The offset of 4
        // accounts for the epoch being 6 Jan 1980 (not 1 Jan) with the
        // first year a leap year.
        let days = (seconds / 86_400) as i32;
        let d = days + 4;
        let year = 1980 + (d / 1461) * 4 + ((d % 1461) / 365);
        let soy = ((year - 1977) / 4) + ((year - 1980) * 365); // 0 = 1 Jan 1980
        let doy = d - soy + 2;

        // Re-origin the day-of-year to 1 March so 29 Feb falls at the
        // end and every 5-month span from March holds 153 days.
        let cut_off = 60 + i32::from(is_leap_year(year));
        let ddd = if doy < cut_off { doy + 305 } else { doy - cut_off };
        let m = (5 * ddd + 2) / 153; // month counting from March
        let month_start = (153 * m + 2) / 5; // day-of-year of month start
        let day_of_mon = ddd - month_start + 1;
        let mon_of_year = ((m + 2) % 12) + 1;

        Self::render(year, mon_of_year, day_of_mon, hour, min, sec, picoseconds)
    }

    /// Renders date/time components as RFC 3339 with 0 or 12 fractional
    /// digits.
    fn render(
        year: i32,
        month: i32,
        day: i32,
        hour: i32,
        min: i32,
        sec: i32,
        picoseconds: Option<u64>,
    ) -> String {
        match picoseconds {
            Some(ps) => format!(
                "{year:04}-{month:02}-{day:02}T{hour:02}:{min:02}:{sec:02}.{ps:012}Z"
            ),
            None => format!("{year:04}-{month:02}-{day:02}T{hour:02}:{min:02}:{sec:02}Z"),
        }
    }

    /// The known `tai-utc.dat` lines backing [`LeapSeconds::builtin`].
    /// Useful for composing extended tables in tests and tools.
    pub fn builtin_lines() -> &'static [&'static str] {
        &FIRST_LINES
    }
}

impl Default for LeapSeconds {
    fn default() -> Self {
        LeapSeconds::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_monotonic() {
        let ls = LeapSeconds::builtin();
        for w in ls.start_date_utc.windows(2) {
            assert!(w[0] < w[1]);
        }
        for w in ls.leap_seconds.windows(2) {
            assert!(w[0] <= w[1]);
        }
    }

    #[test]
    fn leap_counts() {
        let ls = LeapSeconds::builtin();
        // 1972-01-01 starts with 2 post-1970 leap seconds on the books.
        let posix_1972 = 365 * 2 * 86_400;
        assert_eq!(ls.leap_seconds_posix(posix_1972).unwrap(), 2);
        // 1980-01-06 (the GPS epoch) carries 11.
        let gps_epoch = LeapSeconds::ymd_to_posix_day(1980, 1, 6) as i64 * 86_400;
        assert_eq!(ls.leap_seconds_posix(gps_epoch).unwrap(), 11);
        // Anything after the last entry uses the final count.
        assert_eq!(ls.leap_seconds_posix(2_000_000_000).unwrap(), 28);
    }

    #[test]
    fn leap_second_detection() {
        let ls = LeapSeconds::builtin();
        // 2012-07-01 insertion: the UTC second just before the start
        // date is the leap second itself.
        let posix = LeapSeconds::ymd_to_posix_day(2012, 7, 1) as i64 * 86_400;
        let utc_start = posix + ls.leap_seconds_posix(posix).unwrap() as i64;
        assert!(ls.is_leap_second(utc_start - 1).unwrap());
        assert!(!ls.is_leap_second(utc_start).unwrap());
        assert!(!ls.is_leap_second(utc_start - 2).unwrap());
    }

    #[test]
    fn year_and_month_lookup() {
        let ls = LeapSeconds::builtin();
        let posix = LeapSeconds::ymd_to_posix_day(1999, 3, 14) as i64 * 86_400;
        let utc = posix + ls.leap_seconds_posix(posix).unwrap() as i64;
        assert_eq!(ls.year(utc).unwrap(), 1999);
        assert_eq!(ls.month(1999, utc).unwrap(), 3);
    }

    #[test]
    fn utc_string_rendering() {
        let ls = LeapSeconds::builtin();
        let posix = LeapSeconds::ymd_to_posix_day(2001, 2, 3) as i64 * 86_400
            + 4 * 3600
            + 5 * 60
            + 6;
        let utc = posix + ls.leap_seconds_posix(posix).unwrap() as i64;
        assert_eq!(ls.to_string_utc(utc, None).unwrap(), "2001-02-03T04:05:06Z");
        assert_eq!(
            ls.to_string_utc(utc, Some(123)).unwrap(),
            "2001-02-03T04:05:06.000000000123Z"
        );
    }

    #[test]
    fn gps_string_rendering() {
        // 1980-01-06T00:00:00 is GPS second 0.
        assert_eq!(LeapSeconds::to_string_gps(0, None), "1980-01-06T00:00:00Z");
        // One leap year boundary later.
        let day = LeapSeconds::ymd_to_gps_day(1984, 2, 29) as i64;
        assert_eq!(
            LeapSeconds::to_string_gps(day * 86_400 + 3_600, None),
            "1984-02-29T01:00:00Z"
        );
        let day = LeapSeconds::ymd_to_gps_day(2000, 12, 31) as i64;
        assert_eq!(
            LeapSeconds::to_string_gps(day * 86_400 + 86_399, None),
            "2000-12-31T23:59:59Z"
        );
    }

    #[test]
    fn pre_1972_polynomials() {
        let ls = LeapSeconds::builtin();
        // Mid-1965 lands in one of the polynomial rows; the result
        // should be a small fractional offset.
        let midas_1965 = (15.5 * 365.25 * 86_400.0) as f64;
        let v = ls.leap_seconds_fractional(midas_1965, 0.0).unwrap();
        assert!(v.abs() < 10.0, "unexpected offset {v}");
        // Dates ahead of the first polynomial row are unsupported.
        assert!(ls
            .leap_seconds_fractional(-4000.0 * 86_400.0, 0.0)
            .is_err());
    }

    #[test]
    fn extended_table_from_lines() {
        let mut lines: Vec<&str> = FIRST_LINES.to_vec();
        let extra = " 2017 JAN  1 =JD 2457754.5  TAI-UTC=  37.0       S + (MJD - 41317.) X 0.0      S";
        lines.push(extra);
        let ls = LeapSeconds::from_lines(&lines).unwrap();
        assert_eq!(ls.leap_seconds_posix(2_000_000_000).unwrap(), 29);
        // The 2016-12-31T23:59:60 leap second is now in the table.
        let posix = LeapSeconds::ymd_to_posix_day(2017, 1, 1) as i64 * 86_400;
        let utc_start = posix + 29;
        assert!(ls.is_leap_second(utc_start - 1).unwrap());
    }

    #[test]
    fn rejects_tampered_lines() {
        let mut lines: Vec<&str> = FIRST_LINES.to_vec();
        lines[0] = " 1961 JAN  2 =JD 2437300.5  TAI-UTC=   1.4228180 S + (MJD - 37300.) X 0.001296 S";
        assert!(LeapSeconds::from_lines(&lines).is_err());
    }
}
