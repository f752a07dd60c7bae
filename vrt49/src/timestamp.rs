// SPDX-FileCopyrightText: 2025 The vrt49 Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
Multi-epoch timestamp type built on the packet header TSI/TSF modes.

UTC integer seconds count from 1970-01-01T00:00:00 UTC *including* leap
seconds; GPS integer seconds count from 1980-01-06T00:00:00 GPS. POSIX,
Midas (J1950), NORAD (seconds-of-year), IRIG, and PTP values convert
through those two epochs via a [`LeapSeconds`] table.
*/

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::leap_seconds::LeapSeconds;
use crate::packet_header::{Tsf, Tsi};
use crate::VitaError;

/// One second in picoseconds (the RealTime fractional unit).
pub const ONE_SEC_PS: u64 = 1_000_000_000_000;

/// Seconds between the GPS epoch (1980-01-06 GPS) and the UTC epoch
/// (1970-01-01 UTC): 3657 days plus the 11 leap seconds on the books.
pub const GPS2UTC: i64 = 315_964_811;

/// Seconds between the GPS epoch and the PTP (TAI 1970) epoch.
pub const GPS2PTP: i64 = 315_964_819;

/// Seconds between the Midas (J1950) and POSIX (J1970) epochs.
pub const MIDAS2POSIX: i64 = 631_152_000;

const ONE_YEAR_MAX: i64 = 86_400 * 366 + 12; // one year incl. leap seconds
const LAST_WEEKS_OF_YEAR: i64 = 86_400 * 351;
const FIRST_WEEKS_OF_YEAR: i64 = 86_400 * 14;

/// A point in time expressed as TSI/TSF mode pairs plus the integer and
/// fractional words that would appear in a packet prologue.
#[derive(Clone, Debug)]
pub struct Timestamp {
    tsi_mode: Tsi,
    tsf_mode: Tsf,
    tsi: u32,
    tsf: u64,
    ls: Arc<LeapSeconds>,
    sample_rate: Option<f64>,
}

impl PartialEq for Timestamp {
    fn eq(&self, other: &Self) -> bool {
        self.tsi_mode == other.tsi_mode
            && self.tsf_mode == other.tsf_mode
            && self.tsi == other.tsi
            && self.tsf == other.tsf
    }
}
impl Eq for Timestamp {}

impl Timestamp {
    /// The null timestamp (no integer, no fractional part).
    pub fn null() -> Timestamp {
        Timestamp {
            tsi_mode: Tsi::Null,
            tsf_mode: Tsf::Null,
            tsi: 0,
            tsf: 0,
            ls: LeapSeconds::default_instance(),
            sample_rate: None,
        }
    }

    /// Creates a timestamp from raw TSI/TSF fields.
    ///
    /// # Errors
    /// A `RealTimePs` fractional part must stay below one second
    /// (10^12 ps).
    pub fn new(
        tsi_mode: Tsi,
        tsf_mode: Tsf,
        tsi: u32,
        tsf: u64,
        ls: Arc<LeapSeconds>,
    ) -> Result<Timestamp, VitaError> {
        if tsf_mode == Tsf::RealTimePs && tsf >= ONE_SEC_PS {
            return Err(VitaError::OutOfRange);
        }
        Ok(Timestamp {
            tsi_mode,
            tsf_mode,
            tsi: if tsi_mode == Tsi::Null { 0 } else { tsi },
            tsf: if tsf_mode == Tsf::Null { 0 } else { tsf },
            ls,
            sample_rate: None,
        })
    }

    /// Creates a timestamp for the current system time (UTC/RealTime).
    pub fn now(ls: Arc<LeapSeconds>) -> Result<Timestamp, VitaError> {
        let elapsed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| VitaError::InvalidTimeFormat(e.to_string()))?;
        Timestamp::for_time_posix(elapsed.as_secs() as i64, elapsed.subsec_micros() as u64 * 1_000_000, ls)
    }

    /// Creates a UTC timestamp from POSIX seconds and picoseconds. A
    /// POSIX second that starts at a leap-second insertion maps onto
    /// the inserted second's UTC count.
    pub fn for_time_posix(
        seconds: i64,
        picoseconds: u64,
        ls: Arc<LeapSeconds>,
    ) -> Result<Timestamp, VitaError> {
        let leap = ls.leap_seconds_posix_before(seconds)?;
        let sec = seconds + leap as i64;
        Timestamp::new(Tsi::Utc, Tsf::RealTimePs, sec as u32, picoseconds, ls)
    }

    /// Creates a UTC timestamp from Midas (J1950) seconds and
    /// fractional seconds.
    pub fn for_time_midas(
        seconds: f64,
        fractional_seconds: f64,
        ls: Arc<LeapSeconds>,
    ) -> Result<Timestamp, VitaError> {
        Timestamp::for_time_posix(
            seconds as i64 - MIDAS2POSIX,
            (fractional_seconds * ONE_SEC_PS as f64) as u64,
            ls,
        )
    }

    /// Creates a GPS timestamp from a PTP (TAI) time. Only defined for
    /// dates on or after the GPS epoch (1980-01-06).
    pub fn for_time_ptp(
        seconds: i64,
        nanoseconds: u64,
        ls: Arc<LeapSeconds>,
    ) -> Result<Timestamp, VitaError> {
        let gps = seconds - GPS2PTP;
        if gps < 0 {
            return Err(VitaError::TimeBeforeTable(1980));
        }
        Timestamp::new(Tsi::Gps, Tsf::RealTimePs, gps as u32, nanoseconds * 1_000, ls)
    }

    /// Creates a UTC timestamp from NORAD seconds-of-year.
    ///
    /// `leap_counted` selects whether mid-year leap seconds are counted
    /// in the input. When `year` is `None` the current year is assumed,
    /// with a two-week wrap window on either side of the year boundary.
    pub fn for_time_norad(
        seconds: i64,
        picoseconds: u64,
        leap_counted: bool,
        year: Option<i32>,
        ls: Arc<LeapSeconds>,
    ) -> Result<Timestamp, VitaError> {
        if !(0..=ONE_YEAR_MAX).contains(&seconds) {
            return Err(VitaError::IllegalTimeComponents(format!(
                "NORAD seconds {seconds} exceeds one year"
            )));
        }

        let year = match year {
            Some(y) => y,
            None => {
                let now = Timestamp::now(ls.clone())?.seconds_utc()? as i64;
                let yr = ls.year(now)?;
                let start = ls.start_of_year_posix(yr)?;
                let soy = now - start; // approximate seconds-of-year

                if soy < FIRST_WEEKS_OF_YEAR && seconds > LAST_WEEKS_OF_YEAR {
                    yr - 1 // end of previous year
                } else if soy > LAST_WEEKS_OF_YEAR && seconds < FIRST_WEEKS_OF_YEAR {
                    yr + 1 // start of next year
                } else {
                    yr
                }
            }
        };

        if leap_counted {
            let sec = ls.start_of_year_utc(year)? + seconds;
            Timestamp::new(Tsi::Utc, Tsf::RealTimePs, sec as u32, picoseconds, ls)
        } else {
            let sec = ls.start_of_year_posix(year)? + seconds;
            Timestamp::for_time_posix(sec, picoseconds, ls)
        }
    }

    /// Creates a UTC timestamp from IRIG day-of-year time components.
    /// `seconds == 60` is accepted only in the 23:59:60 leap-second
    /// position.
    pub fn for_time_irig(
        seconds: i32,
        minutes: i32,
        hours: i32,
        days: i32,
        hundredths: i32,
        ls: Arc<LeapSeconds>,
    ) -> Result<Timestamp, VitaError> {
        if seconds == 60 && hours == 23 && minutes == 59 {
            // Extremely rare leap second seen as the 61st second.
            return Timestamp::for_time_irig(59, 59, 23, days, hundredths, ls)?.add_seconds(1);
        }
        if !(0..=59).contains(&seconds)
            || !(0..=59).contains(&minutes)
            || !(0..=23).contains(&hours)
            || !(1..=366).contains(&days)
            || !(0..=99).contains(&hundredths)
        {
            return Err(VitaError::IllegalTimeComponents(format!(
                "IRIG time {days}::{hours}:{minutes}:{seconds}+{hundredths}/100"
            )));
        }
        let sec = seconds as i64 + minutes as i64 * 60 + hours as i64 * 3_600
            + (days as i64 - 1) * 86_400;
        let ps = hundredths as u64 * (ONE_SEC_PS / 100);
        Timestamp::for_time_norad(sec, ps, false, None, ls)
    }

    /// Creates a timestamp from calendar components in the GPS or UTC
    /// epoch. `zone` is a seconds offset applied to the result.
    #[allow(clippy::too_many_arguments)]
    pub fn for_time(
        year: i32,
        month: i32,
        day: i32,
        hour: i32,
        minute: i32,
        second: i32,
        picoseconds: u64,
        zone: i32,
        tsi_mode: Tsi,
        ls: Arc<LeapSeconds>,
    ) -> Result<Timestamp, VitaError> {
        match tsi_mode {
            Tsi::Gps => {
                let d = LeapSeconds::ymd_to_gps_day(year, month, day) as i64;
                let tsi =
                    d * 86_400 + hour as i64 * 3_600 + minute as i64 * 60 + second as i64 + zone as i64;
                Timestamp::new(Tsi::Gps, Tsf::RealTimePs, tsi as u32, picoseconds, ls)
            }
            Tsi::Utc => {
                if second == 60 {
                    // POSIX math can't land on the inserted second, so
                    // build the second before and step over it.
                    return Timestamp::for_time(
                        year, month, day, hour, minute, 59, picoseconds, zone, tsi_mode, ls,
                    )?
                    .add_seconds(1);
                }
                let d = LeapSeconds::ymd_to_posix_day(year, month, day) as i64;
                let posix =
                    d * 86_400 + hour as i64 * 3_600 + minute as i64 * 60 + second as i64 + zone as i64;
                let leap = ls.leap_seconds_posix_before(posix)?;
                Timestamp::new(
                    Tsi::Utc,
                    Tsf::RealTimePs,
                    (posix + leap as i64) as u32,
                    picoseconds,
                    ls,
                )
            }
            _ => Err(VitaError::EpochMismatch),
        }
    }

    /// Parses an ISO 8601 / RFC 3339 time string
    /// (`YYYY-MM-DDTHH:MM:SS[.fff...][Z|±HH[:MM]]`) in the GPS or UTC
    /// epoch.
    pub fn parse_time(
        time: &str,
        tsi_mode: Tsi,
        ls: Arc<LeapSeconds>,
    ) -> Result<Timestamp, VitaError> {
        let bad = || VitaError::InvalidTimeFormat(time.to_string());
        let t = time.find('T').ok_or_else(bad)?;
        let d1 = time[1..].find('-').map(|i| i + 1).ok_or_else(bad)?;
        let d2 = time[d1 + 2..].find('-').map(|i| i + d1 + 2).ok_or_else(bad)?;
        let c1 = time[t + 2..].find(':').map(|i| i + t + 2).ok_or_else(bad)?;
        let c2 = time[c1 + 2..].find(':').map(|i| i + c1 + 2).ok_or_else(bad)?;
        let p = time[c2 + 2..].find('.').map(|i| i + c2 + 2);
        let tz = time[c2 + 2..]
            .find(|c| c == 'Z' || c == '+')
            .map(|i| i + c2 + 2)
            .or_else(|| time[c2 + 3..].find('-').map(|i| i + c2 + 3))
            .unwrap_or(time.len());

        let year: i32 = time[..d1].parse().map_err(|_| bad())?;
        let month: i32 = time[d1 + 1..d2].parse().map_err(|_| bad())?;
        let day: i32 = time[d2 + 1..t].parse().map_err(|_| bad())?;
        let hour: i32 = time[t + 1..c1].parse().map_err(|_| bad())?;
        let minute: i32 = time[c1 + 1..c2].parse().map_err(|_| bad())?;
        let (second, picoseconds): (i32, u64) = match p {
            Some(p) => {
                let frac = format!("{:0<12}", &time[p + 1..tz]);
                (
                    time[c2 + 1..p].parse().map_err(|_| bad())?,
                    frac[..12].parse().map_err(|_| bad())?,
                )
            }
            None => (time[c2 + 1..tz].parse().map_err(|_| bad())?, 0),
        };

        let z = &time[tz..];
        let mut zone = 0;
        if !z.is_empty() && z != "Z" {
            zone = match z[1..].find(':') {
                Some(c) => {
                    3_600 * z[1..c + 1].parse::<i32>().map_err(|_| bad())?
                        + 60 * z[c + 2..].parse::<i32>().map_err(|_| bad())?
                }
                None => 3_600 * z[1..].parse::<i32>().map_err(|_| bad())?,
            };
            if z.starts_with('-') {
                zone = -zone;
            }
        }

        Timestamp::for_time(year, month, day, hour, minute, second, picoseconds, zone, tsi_mode, ls)
    }

    /// Returns true when both modes are null.
    pub fn is_null(&self) -> bool {
        self.tsi_mode == Tsi::Null && self.tsf_mode == Tsf::Null
    }

    /// Gets the integer timestamp mode.
    pub fn tsi_mode(&self) -> Tsi {
        self.tsi_mode
    }

    /// Gets the fractional timestamp mode.
    pub fn tsf_mode(&self) -> Tsf {
        self.tsf_mode
    }

    /// Gets the raw integer timestamp field.
    pub fn integer(&self) -> u32 {
        self.tsi
    }

    /// Gets the raw fractional timestamp field.
    pub fn fractional(&self) -> u64 {
        self.tsf
    }

    /// Gets the leap-second table this timestamp resolves against.
    pub fn leap_seconds(&self) -> &Arc<LeapSeconds> {
        &self.ls
    }

    /// Gets the sample rate used for SampleCount conversions, if set.
    pub fn sample_rate(&self) -> Option<f64> {
        self.sample_rate
    }

    /// Sets the sample rate used for SampleCount conversions.
    pub fn set_sample_rate(&mut self, sample_rate: Option<f64>) {
        self.sample_rate = sample_rate;
    }

    /// Integer seconds in the UTC epoch (leap seconds included).
    pub fn seconds_utc(&self) -> Result<u32, VitaError> {
        match self.tsi_mode {
            Tsi::Utc => Ok(self.tsi),
            Tsi::Gps => {
                let utc = self.tsi as i64 + GPS2UTC;
                u32::try_from(utc).map_err(|_| VitaError::TimeOverflow)
            }
            _ => Err(VitaError::EpochMismatch),
        }
    }

    /// Integer seconds in the GPS epoch.
    pub fn seconds_gps(&self) -> Result<u32, VitaError> {
        match self.tsi_mode {
            Tsi::Gps => Ok(self.tsi),
            Tsi::Utc => {
                let gps = self.tsi as i64 - GPS2UTC;
                u32::try_from(gps).map_err(|_| VitaError::TimeOverflow)
            }
            _ => Err(VitaError::EpochMismatch),
        }
    }

    /// Integer seconds in the POSIX epoch (leap seconds excluded).
    pub fn seconds_posix(&self) -> Result<i64, VitaError> {
        let utc = self.seconds_utc()? as i64;
        Ok(utc - self.ls.leap_seconds_utc(utc)? as i64)
    }

    /// Seconds since the start of the current UTC year.
    /// `leap_counted` selects whether mid-year leap seconds appear in
    /// the count.
    pub fn seconds_norad(&self, leap_counted: bool) -> Result<i64, VitaError> {
        let utc = self.seconds_utc()? as i64;
        let year = self.ls.year(utc)?;
        let year_start = self.ls.start_of_year_utc(year)?;
        if leap_counted {
            Ok(utc - year_start)
        } else {
            let mid_year_leaps =
                self.ls.leap_seconds_utc(utc)? - self.ls.leap_seconds_utc(year_start)?;
            Ok(utc - year_start - mid_year_leaps as i64)
        }
    }

    /// Whole seconds since the Midas (J1950) epoch.
    pub fn midas_seconds(&self) -> Result<f64, VitaError> {
        Ok((self.seconds_posix()? + MIDAS2POSIX) as f64)
    }

    /// Fractional part in picoseconds. SampleCount values convert
    /// through the sample rate.
    pub fn picoseconds(&self) -> Result<u64, VitaError> {
        match self.tsf_mode {
            Tsf::RealTimePs => Ok(self.tsf),
            Tsf::SampleCount => {
                let sr = self.sample_rate.ok_or(VitaError::EpochMismatch)?;
                Ok((self.tsf as f64 * ONE_SEC_PS as f64 / sr) as u64)
            }
            _ => Err(VitaError::EpochMismatch),
        }
    }

    /// Fractional part as a sample count.
    pub fn sample_count(&self) -> Result<u64, VitaError> {
        if self.tsf_mode != Tsf::SampleCount {
            return Err(VitaError::EpochMismatch);
        }
        Ok(self.tsf)
    }

    /// UTC seconds plus fraction, as a double.
    pub fn double_seconds(&self) -> Result<f64, VitaError> {
        let ps = self.picoseconds()? as f64;
        Ok(self.seconds_utc()? as f64 + ps / ONE_SEC_PS as f64)
    }

    /// Returns a copy converted to the UTC epoch.
    pub fn to_utc(&self) -> Result<Timestamp, VitaError> {
        if self.tsi_mode == Tsi::Utc {
            return Ok(self.clone());
        }
        let mut ts = self.clone();
        ts.tsi = self.seconds_utc()?;
        ts.tsi_mode = Tsi::Utc;
        Ok(ts)
    }

    /// Returns a copy converted to the GPS epoch.
    pub fn to_gps(&self) -> Result<Timestamp, VitaError> {
        if self.tsi_mode == Tsi::Gps {
            return Ok(self.clone());
        }
        let mut ts = self.clone();
        ts.tsi = self.seconds_gps()?;
        ts.tsi_mode = Tsi::Gps;
        Ok(ts)
    }

    /// Adds whole seconds.
    pub fn add_seconds(&self, sec: i64) -> Result<Timestamp, VitaError> {
        self.add_time(sec, 0)
    }

    /// Adds picoseconds (may be more than one second's worth).
    pub fn add_picoseconds(&self, ps: i64) -> Result<Timestamp, VitaError> {
        self.add_time(0, ps)
    }

    fn add_time(&self, sec: i64, fsec: i64) -> Result<Timestamp, VitaError> {
        if !matches!(self.tsi_mode, Tsi::Utc | Tsi::Gps) {
            return Err(VitaError::EpochMismatch);
        }
        if fsec != 0 && self.tsf_mode != Tsf::RealTimePs {
            return Err(VitaError::EpochMismatch);
        }
        let unit = ONE_SEC_PS as i64;
        let mut s = self.tsi as i64 + sec + fsec.div_euclid(unit);
        let mut f = self.tsf as i64 + fsec.rem_euclid(unit);
        if f >= unit {
            s += 1;
            f -= unit;
        }
        let mut ts = self.clone();
        ts.tsi = u32::try_from(s).map_err(|_| VitaError::TimeOverflow)?;
        ts.tsf = f as u64;
        Ok(ts)
    }

    /// Compares two timestamps.
    ///
    /// # Errors
    /// Timestamps with incomparable integer or fractional modes (e.g.
    /// `Other` vs. UTC, or SampleCount vs. RealTime) return an error.
    pub fn compare_to(&self, other: &Timestamp) -> Result<Ordering, VitaError> {
        let int_order = if self.tsi_mode == other.tsi_mode {
            self.tsi.cmp(&other.tsi)
        } else {
            let a = self.seconds_gps()?;
            let b = other.seconds_gps()?;
            a.cmp(&b)
        };
        if int_order != Ordering::Equal {
            return Ok(int_order);
        }
        if self.tsf_mode != other.tsf_mode {
            return Err(VitaError::EpochMismatch);
        }
        Ok(self.tsf.cmp(&other.tsf))
    }

    /// Renders in the UTC epoch without the epoch suffix.
    pub fn to_string_utc(&self) -> Result<String, VitaError> {
        let ps = (self.tsf_mode == Tsf::RealTimePs).then_some(self.tsf);
        self.ls.to_string_utc(self.seconds_utc()? as i64, ps)
    }

    /// Renders in the GPS epoch without the epoch suffix.
    pub fn to_string_gps(&self) -> Result<String, VitaError> {
        let ps = (self.tsf_mode == Tsf::RealTimePs).then_some(self.tsf);
        Ok(LeapSeconds::to_string_gps(self.seconds_gps()? as i64, ps))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let frac_only = || match self.tsf_mode {
            Tsf::Null => String::new(),
            Tsf::SampleCount => format!("{} (SampleCount)", self.tsf),
            Tsf::RealTimePs => format!("0.{:012} (RealTime)", self.tsf),
            Tsf::FreeRunningCount => format!("{} (FreeRunningCount)", self.tsf),
        };
        match self.tsi_mode {
            Tsi::Null => write!(f, "{}", frac_only()),
            Tsi::Utc => {
                let rendered = self.to_string_utc().map_err(|_| fmt::Error)?;
                match self.tsf_mode {
                    Tsf::Null | Tsf::RealTimePs => write!(f, "{rendered} (UTC)"),
                    Tsf::SampleCount => write!(f, "{rendered},{} (UTC,SampleCount)", self.tsf),
                    Tsf::FreeRunningCount => {
                        write!(f, "{rendered},{} (UTC,FreeRunningCount)", self.tsf)
                    }
                }
            }
            Tsi::Gps => {
                let rendered = self.to_string_gps().map_err(|_| fmt::Error)?;
                match self.tsf_mode {
                    Tsf::Null | Tsf::RealTimePs => write!(f, "{rendered} (GPS)"),
                    Tsf::SampleCount => write!(f, "{rendered},{} (GPS,SampleCount)", self.tsf),
                    Tsf::FreeRunningCount => {
                        write!(f, "{rendered},{} (GPS,FreeRunningCount)", self.tsf)
                    }
                }
            }
            Tsi::Other => match self.tsf_mode {
                Tsf::Null => write!(f, "{} (Other)", self.tsi),
                Tsf::SampleCount => write!(f, "{},{} (Other,SampleCount)", self.tsi, self.tsf),
                Tsf::RealTimePs => {
                    write!(f, "{},0.{:012} (Other,RealTime)", self.tsi, self.tsf)
                }
                Tsf::FreeRunningCount => {
                    write!(f, "{},{} (Other,FreeRunningCount)", self.tsi, self.tsf)
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Arc<LeapSeconds> {
        LeapSeconds::default_instance()
    }

    #[test]
    fn gps_utc_identity() {
        let ls = table();
        for &utc in &[GPS2UTC as u32, 1_000_000_000, 1_400_000_000, u32::MAX] {
            let ts = Timestamp::new(Tsi::Utc, Tsf::Null, utc, 0, ls.clone()).unwrap();
            let gps = ts.to_gps().unwrap();
            assert_eq!(gps.seconds_utc().unwrap(), utc);
        }
        // Before the GPS epoch there is no GPS representation.
        let early = Timestamp::new(Tsi::Utc, Tsf::Null, 1000, 0, ls).unwrap();
        assert!(early.seconds_gps().is_err());
    }

    #[test]
    fn posix_round_trip() {
        let ls = table();
        for &posix in &[63_072_000i64, 1_000_000_000, 1_435_708_800] {
            let ts = Timestamp::for_time_posix(posix, 0, ls.clone()).unwrap();
            assert_eq!(ts.seconds_posix().unwrap(), posix);
        }
    }

    #[test]
    fn realtime_fraction_is_validated() {
        let ls = table();
        assert!(Timestamp::new(Tsi::Utc, Tsf::RealTimePs, 0, ONE_SEC_PS, ls.clone()).is_err());
        assert!(Timestamp::new(Tsi::Utc, Tsf::RealTimePs, 0, ONE_SEC_PS - 1, ls).is_ok());
    }

    #[test]
    fn parse_and_render() {
        let ls = table();
        let ts = Timestamp::parse_time("2001-02-03T04:05:06.25Z", Tsi::Utc, ls).unwrap();
        assert_eq!(ts.fractional(), 250_000_000_000);
        assert_eq!(
            ts.to_string_utc().unwrap(),
            "2001-02-03T04:05:06.250000000000Z"
        );
        assert!(format!("{ts}").ends_with(" (UTC)"));
    }

    #[test]
    fn parse_gps_epoch_start() {
        let ls = table();
        let ts = Timestamp::parse_time("1980-01-06T00:00:00Z", Tsi::Gps, ls).unwrap();
        assert_eq!(ts.integer(), 0);
        assert_eq!(ts.seconds_utc().unwrap() as i64, GPS2UTC);
    }

    #[test]
    fn ptp_conversion() {
        let ls = table();
        let ts = Timestamp::for_time_ptp(GPS2PTP, 500, ls.clone()).unwrap();
        assert_eq!(ts.integer(), 0);
        assert_eq!(ts.fractional(), 500_000);
        assert!(Timestamp::for_time_ptp(0, 0, ls).is_err());
    }

    #[test]
    fn norad_modes() {
        let ls = table();
        // 1997 had a June 30 leap second; a date in December differs by
        // one second between the counted and skipped conventions.
        let soy = 200 * 86_400;
        let counted =
            Timestamp::for_time_norad(soy, 0, true, Some(1997), ls.clone()).unwrap();
        let skipped =
            Timestamp::for_time_norad(soy, 0, false, Some(1997), ls.clone()).unwrap();
        assert_eq!(
            counted.seconds_utc().unwrap() + 1,
            skipped.seconds_utc().unwrap()
        );
        assert_eq!(counted.seconds_norad(true).unwrap(), soy);
        assert_eq!(skipped.seconds_norad(false).unwrap(), soy);
        assert!(Timestamp::for_time_norad(ONE_YEAR_MAX + 1, 0, true, Some(1997), ls).is_err());
    }

    #[test]
    fn irig_validation() {
        let ls = table();
        assert!(Timestamp::for_time_irig(61, 0, 0, 1, 0, ls.clone()).is_err());
        assert!(Timestamp::for_time_irig(0, 0, 24, 1, 0, ls.clone()).is_err());
        assert!(Timestamp::for_time_irig(0, 0, 0, 0, 0, ls.clone()).is_err());
        // The 23:59:60 leap position is legal.
        assert!(Timestamp::for_time_irig(60, 59, 23, 180, 0, ls.clone()).is_ok());
        let ts = Timestamp::for_time_irig(5, 4, 3, 2, 50, ls).unwrap();
        assert_eq!(ts.fractional(), ONE_SEC_PS / 2);
    }

    #[test]
    fn add_time_carries() {
        let ls = table();
        let ts = Timestamp::new(Tsi::Utc, Tsf::RealTimePs, 100, ONE_SEC_PS - 1, ls).unwrap();
        let later = ts.add_picoseconds(2).unwrap();
        assert_eq!(later.integer(), 101);
        assert_eq!(later.fractional(), 1);
        let earlier = later.add_picoseconds(-2).unwrap();
        assert_eq!(earlier, ts);
    }

    #[test]
    fn ordering_across_epochs() {
        let ls = table();
        let utc = Timestamp::new(Tsi::Utc, Tsf::Null, GPS2UTC as u32 + 10, 0, ls.clone()).unwrap();
        let gps = Timestamp::new(Tsi::Gps, Tsf::Null, 11, 0, ls).unwrap();
        assert_eq!(utc.compare_to(&gps).unwrap(), Ordering::Less);
    }
}
