// SPDX-FileCopyrightText: 2025 The vrt49 Authors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
Data structures and methods related to the spectral metadata field
(ANSI/VITA-49.2-2017 section 9.6.1).
*/

use core::fmt;
use std::convert::From;

use deku::prelude::*;
use fixed::{
    types::extra::{U12, U20},
    FixedI32, FixedI64,
};

use crate::VitaError;

/// Base spectrum field data structure.
#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default, DekuRead, DekuWrite,
)]
#[deku(endian = "endian", ctx = "endian: deku::ctx::Endian")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Spectrum {
    /// Spectrum type (packed with the averaging type and window
    /// time-delta interpretation).
    spectrum_type: u32,
    /// Window type
    window_type: u32,
    /// The size of the mathematical transform used to create the spectral
    /// data, i.e., FFT size
    num_transform_points: u32,
    /// In certain circumstances, particularly when using decimating algorithms,
    /// the # points in the window may be different than the # points in the
    /// spectrum transform.
    num_window_points: u32,
    /// Resolution of the spectral points, equivalent to a transform bin size
    /// or bandwidth, using the existing VITA49 bandwidth field definition for
    /// its format.
    resolution: i64,
    /// The overall bandwidth given by the spectral data; for a DFT it would
    /// describe the spectral extent (1st point to last point) of the data.
    span: i64,
    /// Describes the extent of averaging or smoothing applied to the data.
    num_averages: u32,
    /// Provides the mathematical coefficient when nonlinear (such as exponential)
    /// averaging is used.
    weighting_factor: i32,
    /// Left-side index of subset of spectral data. Integer index number (not
    /// a frequency).
    f1_index: i32,
    /// Right-side index of subset of spectral data. Integer index number (not
    /// a frequency).
    f2_index: i32,
    /// Describes the amount of overlap in successive spectral transforms,
    /// in one of 3 ways: time, percent, # samples.
    window_time_delta: WindowTimeDelta,
}

/// Type of spectral data being presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpectrumType {
    /// Default "no setting".
    Default,
    /// Log power (dB).
    LogPowerDb,
    /// Cartesian (I, Q).
    Cartesian,
    /// Polar (magnitude, phase).
    Polar,
    /// Magnitude.
    Magnitude,
    /// Reserved for future expansion.
    Reserved,
    /// User defined type (128..=255).
    UserDefined(u8),
}

impl From<u8> for SpectrumType {
    fn from(value: u8) -> Self {
        match value {
            0 => SpectrumType::Default,
            1 => SpectrumType::LogPowerDb,
            2 => SpectrumType::Cartesian,
            3 => SpectrumType::Polar,
            4 => SpectrumType::Magnitude,
            5..=127 => SpectrumType::Reserved,
            128..=255 => SpectrumType::UserDefined(value),
        }
    }
}

impl TryFrom<SpectrumType> for u8 {
    type Error = VitaError;

    fn try_from(value: SpectrumType) -> Result<Self, Self::Error> {
        match value {
            SpectrumType::Default => Ok(0),
            SpectrumType::LogPowerDb => Ok(1),
            SpectrumType::Cartesian => Ok(2),
            SpectrumType::Polar => Ok(3),
            SpectrumType::Magnitude => Ok(4),
            SpectrumType::UserDefined(v) if v >= 128 => Ok(v),
            SpectrumType::UserDefined(_) => Err(VitaError::OutOfRange),
            SpectrumType::Reserved => Err(VitaError::ReservedField),
        }
    }
}

/// Type of averaging being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AveragingType {
    /// No averaging.
    None,
    /// Linear averaging.
    Linear,
    /// Peak hold averaging.
    PeakHold,
    /// Min hold averaging.
    MinHold,
    /// Exponential averaging.
    Exponential,
    /// Median averaging.
    Median,
    /// Smoothing (within the sample frame).
    Smoothing,
    /// Reserved for future expansion.
    Reserved,
}

impl From<u8> for AveragingType {
    fn from(value: u8) -> Self {
        match value {
            0 => AveragingType::None,
            1 => AveragingType::Linear,
            2 => AveragingType::PeakHold,
            4 => AveragingType::MinHold,
            8 => AveragingType::Exponential,
            16 => AveragingType::Median,
            32 => AveragingType::Smoothing,
            _ => AveragingType::Reserved,
        }
    }
}

impl TryFrom<AveragingType> for u8 {
    type Error = VitaError;

    fn try_from(value: AveragingType) -> Result<Self, Self::Error> {
        match value {
            AveragingType::None => Ok(0),
            AveragingType::Linear => Ok(1),
            AveragingType::PeakHold => Ok(2),
            AveragingType::MinHold => Ok(4),
            AveragingType::Exponential => Ok(8),
            AveragingType::Median => Ok(16),
            AveragingType::Smoothing => Ok(32),
            AveragingType::Reserved => Err(VitaError::ReservedField),
        }
    }
}

/// Interpretation options for the window time delta field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WindowTimeDeltaInterpretation {
    /// Overlap is not controlled.
    OverlapNotControlled,
    /// Percent overlap.
    PercentOverlap,
    /// Samples.
    Samples,
    /// Time.
    Time,
    /// Reserved for future expansion.
    Reserved,
}

impl From<u8> for WindowTimeDeltaInterpretation {
    fn from(value: u8) -> Self {
        match value {
            0 => WindowTimeDeltaInterpretation::OverlapNotControlled,
            1 => WindowTimeDeltaInterpretation::PercentOverlap,
            2 => WindowTimeDeltaInterpretation::Samples,
            3 => WindowTimeDeltaInterpretation::Time,
            _ => WindowTimeDeltaInterpretation::Reserved,
        }
    }
}

impl TryFrom<WindowTimeDeltaInterpretation> for u8 {
    type Error = VitaError;

    fn try_from(value: WindowTimeDeltaInterpretation) -> Result<Self, Self::Error> {
        match value {
            WindowTimeDeltaInterpretation::OverlapNotControlled => Ok(0),
            WindowTimeDeltaInterpretation::PercentOverlap => Ok(1),
            WindowTimeDeltaInterpretation::Samples => Ok(2),
            WindowTimeDeltaInterpretation::Time => Ok(3),
            WindowTimeDeltaInterpretation::Reserved => Err(VitaError::ReservedField),
        }
    }
}

/// Window type enumeration.
///
/// Some variants include an alpha coefficient as a 3-digit suffix
/// (e.g. `Hanning100` is a Hanning window with a 1.00 alpha
/// coefficient).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WindowType {
    /// Rectangle windowing.
    Rectangle,
    /// Triangle windowing.
    Triangle,
    /// Hanning windowing (1.00 "alpha").
    Hanning100,
    /// Hanning windowing (2.00 "alpha").
    Hanning200,
    /// Hanning windowing (3.00 "alpha").
    Hanning300,
    /// Hanning windowing (4.00 "alpha").
    Hanning400,
    /// Hamming windowing.
    Hamming,
    /// Riesz windowing.
    Riesz,
    /// Riemann windowing.
    Riemann,
    /// De La Vallepoussin windowing.
    DeLaVallepoussin,
    /// Tukey windowing (0.25 "alpha").
    Tukey025,
    /// Tukey windowing (0.50 "alpha").
    Tukey050,
    /// Tukey windowing (0.75 "alpha").
    Tukey075,
    /// Bohman windowing.
    Bohman,
    /// Poisson windowing (2.00 "alpha").
    Poisson200,
    /// Poisson windowing (3.00 "alpha").
    Poisson300,
    /// Poisson windowing (4.00 "alpha").
    Poisson400,
    /// Hanning-Poisson windowing (0.50 "alpha").
    HanningPoisson050,
    /// Hanning-Poisson windowing (1.00 "alpha").
    HanningPoisson100,
    /// Hanning-Poisson windowing (2.00 "alpha").
    HanningPoisson200,
    /// Cauchy windowing (3.00 "alpha").
    Cauchy300,
    /// Cauchy windowing (4.00 "alpha").
    Cauchy400,
    /// Cauchy windowing (5.00 "alpha").
    Cauchy500,
    /// Gaussian windowing (2.50 "alpha").
    Gaussian250,
    /// Gaussian windowing (3.00 "alpha").
    Gaussian300,
    /// Gaussian windowing (3.50 "alpha").
    Gaussian350,
    /// Dolph-Chebyshiev windowing (2.50 "alpha").
    DolphChebyshiev250,
    /// Dolph-Chebyshiev windowing (3.00 "alpha").
    DolphChebyshiev300,
    /// Dolph-Chebyshiev windowing (3.50 "alpha").
    DolphChebyshiev350,
    /// Dolph-Chebyshiev windowing (4.00 "alpha").
    DolphChebyshiev400,
    /// Kaiser-Bessel windowing (2.00 "alpha").
    KaiserBessel200,
    /// Kaiser-Bessel windowing (2.50 "alpha").
    KaiserBessel250,
    /// Kaiser-Bessel windowing (3.00 "alpha").
    KaiserBessel300,
    /// Kaiser-Bessel windowing (3.50 "alpha").
    KaiserBessel350,
    /// Barcilon-Temes windowing (3.00 "alpha").
    BarcilonTemes300,
    /// Barcilon-Temes windowing (3.50 "alpha").
    BarcilonTemes350,
    /// Barcilon-Temes windowing (4.00 "alpha").
    BarcilonTemes400,
    /// Exact Blackman windowing.
    ExactBlackman,
    /// Blackman windowing.
    Blackman,
    /// Blackman-Harris windowing (minimum 3-sample).
    BlackmanHarrisMin3Sample,
    /// Blackman-Harris windowing (minimum 4-sample).
    BlackmanHarrisMin4Sample,
    /// Blackman-Harris windowing (61 dB, 3-sample).
    BlackmanHarris61Db3Sample,
    /// Blackman-Harris windowing (74 dB, 4-sample).
    BlackmanHarris74Db4Sample,
    /// Kaiser-Bessel windowing (4-sample, 3.00 "alpha").
    KaiserBessel4Sample300,
    /// Reserved for future expansion.
    Reserved,
    /// User-defined windowing scheme (100..=255).
    Other(u8),
}

#[rustfmt::skip]
const WINDOW_TYPES: [WindowType; 44] = [
    WindowType::Rectangle, WindowType::Triangle, WindowType::Hanning100,
    WindowType::Hanning200, WindowType::Hanning300, WindowType::Hanning400,
    WindowType::Hamming, WindowType::Riesz, WindowType::Riemann,
    WindowType::DeLaVallepoussin, WindowType::Tukey025, WindowType::Tukey050,
    WindowType::Tukey075, WindowType::Bohman, WindowType::Poisson200,
    WindowType::Poisson300, WindowType::Poisson400, WindowType::HanningPoisson050,
    WindowType::HanningPoisson100, WindowType::HanningPoisson200, WindowType::Cauchy300,
    WindowType::Cauchy400, WindowType::Cauchy500, WindowType::Gaussian250,
    WindowType::Gaussian300, WindowType::Gaussian350, WindowType::DolphChebyshiev250,
    WindowType::DolphChebyshiev300, WindowType::DolphChebyshiev350, WindowType::DolphChebyshiev400,
    WindowType::KaiserBessel200, WindowType::KaiserBessel250, WindowType::KaiserBessel300,
    WindowType::KaiserBessel350, WindowType::BarcilonTemes300, WindowType::BarcilonTemes350,
    WindowType::BarcilonTemes400, WindowType::ExactBlackman, WindowType::Blackman,
    WindowType::BlackmanHarrisMin3Sample, WindowType::BlackmanHarrisMin4Sample,
    WindowType::BlackmanHarris61Db3Sample, WindowType::BlackmanHarris74Db4Sample,
    WindowType::KaiserBessel4Sample300,
];

impl From<u8> for WindowType {
    fn from(value: u8) -> Self {
        match value {
            0..=43 => WINDOW_TYPES[value as usize],
            44..=99 => WindowType::Reserved,
            100..=255 => WindowType::Other(value),
        }
    }
}

impl TryFrom<WindowType> for u8 {
    type Error = VitaError;

    fn try_from(value: WindowType) -> Result<Self, Self::Error> {
        match value {
            WindowType::Reserved => Err(VitaError::ReservedField),
            WindowType::Other(v) if v >= 100 => Ok(v),
            WindowType::Other(_) => Err(VitaError::OutOfRange),
            known => Ok(WINDOW_TYPES
                .iter()
                .position(|w| *w == known)
                .expect("window type table covers all fixed variants") as u8),
        }
    }
}

/// Window time delta structure.
///
/// Provides accessor methods that help handle the different
/// possible formats this field can have.
#[derive(
    Debug, Default, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, DekuRead, DekuWrite,
)]
#[deku(endian = "endian", ctx = "endian: deku::ctx::Endian")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowTimeDelta(u32);

impl WindowTimeDelta {
    /// Create a new window time-delta from some timestamp (nanoseconds).
    pub fn from_time_ns(time_ns: u32) -> WindowTimeDelta {
        WindowTimeDelta(time_ns)
    }

    /// Create a new window time-delta from some sample counter.
    pub fn from_samples(samples: u32) -> WindowTimeDelta {
        WindowTimeDelta(samples)
    }

    /// Create a new window time-delta from some percent overlap.
    pub fn from_percent_overlap(percent_overlap: f32) -> WindowTimeDelta {
        let mut ret = WindowTimeDelta::default();
        ret.set_percent_overlap(percent_overlap);
        ret
    }

    /// Get the window time-delta as nanoseconds.
    pub fn as_time_ns(&self) -> u32 {
        self.0
    }

    /// Set the window time-delta as nanoseconds.
    pub fn set_time_ns(&mut self, time_ns: u32) {
        self.0 = time_ns;
    }

    /// Get the window time-delta as raw samples.
    pub fn as_samples(&self) -> u32 {
        self.0
    }

    /// Set the window time-delta as raw samples.
    pub fn set_samples(&mut self, samples: u32) {
        self.0 = samples;
    }

    /// Get the window time-delta as percent overlap.
    pub fn as_percent_overlap(&self) -> f32 {
        FixedI32::<U12>::from_bits(self.0 as i32).to_num()
    }

    /// Set the window time-delta as percent overlap.
    pub fn set_percent_overlap(&mut self, percent_overlap: f32) {
        self.0 = FixedI32::<U12>::from_num(percent_overlap).to_bits() as u32;
    }
}

impl Spectrum {
    /// Generate a new spectrum object with default fields.
    pub fn new() -> Spectrum {
        Spectrum::default()
    }

    /// Gets the spectrum type
    pub fn spectrum_type(&self) -> SpectrumType {
        SpectrumType::from((self.spectrum_type & 0xFF) as u8)
    }

    /// Sets the spectrum type.
    ///
    /// # Errors
    /// User-defined types must be in 128..=255 and the reserved
    /// variant can't be written.
    pub fn set_spectrum_type(&mut self, spectrum_type: SpectrumType) -> Result<(), VitaError> {
        let v: u8 = spectrum_type.try_into()?;
        self.spectrum_type = (self.spectrum_type & !0xFF) | (v as u32);
        Ok(())
    }

    /// Gets the averaging type.
    pub fn averaging_type(&self) -> AveragingType {
        AveragingType::from(((self.spectrum_type >> 8) & 0xFF) as u8)
    }

    /// Sets the averaging type.
    ///
    /// # Errors
    /// The reserved variant can't be written.
    pub fn set_averaging_type(&mut self, averaging_type: AveragingType) -> Result<(), VitaError> {
        let v: u8 = averaging_type.try_into()?;
        self.spectrum_type = (self.spectrum_type & !(0xFF << 8)) | ((v as u32) << 8);
        Ok(())
    }

    /// Gets the window time-delta interpretation.
    pub fn window_time_delta_interpretation(&self) -> WindowTimeDeltaInterpretation {
        WindowTimeDeltaInterpretation::from(((self.spectrum_type >> 16) & 0b1111) as u8)
    }

    /// Sets the window time-delta interpretation.
    ///
    /// # Errors
    /// The reserved variant can't be written.
    pub fn set_window_time_delta_interpretation(
        &mut self,
        interpretation: WindowTimeDeltaInterpretation,
    ) -> Result<(), VitaError> {
        let v: u8 = interpretation.try_into()?;
        self.spectrum_type = (self.spectrum_type & !(0b1111 << 16)) | ((v as u32) << 16);
        Ok(())
    }

    /// Get the raw spectrum type field.
    pub fn spectrum_type_as_u32(&self) -> u32 {
        self.spectrum_type
    }

    /// Get the window type field.
    pub fn window_type(&self) -> WindowType {
        WindowType::from((self.window_type & 0xFF) as u8)
    }

    /// Set the window type field.
    ///
    /// # Errors
    /// User-defined types must be in 100..=255 and the reserved
    /// variant can't be written.
    pub fn set_window_type(&mut self, window_type: WindowType) -> Result<(), VitaError> {
        let v: u8 = window_type.try_into()?;
        self.window_type = v as u32;
        Ok(())
    }

    /// Get the number of transform points.
    pub fn num_transform_points(&self) -> u32 {
        self.num_transform_points
    }

    /// Set the number of transform points.
    pub fn set_num_transform_points(&mut self, num_transform_points: u32) {
        self.num_transform_points = num_transform_points;
    }

    /// Get the number of window points.
    pub fn num_window_points(&self) -> u32 {
        self.num_window_points
    }

    /// Set the number of window points.
    pub fn set_num_window_points(&mut self, num_window_points: u32) {
        self.num_window_points = num_window_points;
    }

    /// Get the spectral resolution (Hz).
    pub fn resolution_hz(&self) -> f64 {
        FixedI64::<U20>::from_bits(self.resolution).to_num()
    }

    /// Set the spectral resolution (Hz).
    pub fn set_resolution_hz(&mut self, resolution_hz: f64) {
        self.resolution = FixedI64::<U20>::from_num(resolution_hz).to_bits();
    }

    /// Get the spectral span (Hz).
    pub fn span_hz(&self) -> f64 {
        FixedI64::<U20>::from_bits(self.span).to_num()
    }

    /// Set the spectral span (Hz).
    pub fn set_span_hz(&mut self, span_hz: f64) {
        self.span = FixedI64::<U20>::from_num(span_hz).to_bits();
    }

    /// Get the number of averages.
    pub fn num_averages(&self) -> u32 {
        self.num_averages
    }

    /// Set the number of averages.
    pub fn set_num_averages(&mut self, num_averages: u32) {
        self.num_averages = num_averages;
    }

    /// Get the weighting factor.
    pub fn weighting_factor(&self) -> i32 {
        self.weighting_factor
    }

    /// Set the weighting factor.
    pub fn set_weighting_factor(&mut self, weighting_factor: i32) {
        self.weighting_factor = weighting_factor;
    }

    /// Get the F1 index.
    pub fn f1_index(&self) -> i32 {
        self.f1_index
    }

    /// Set the F1 index.
    pub fn set_f1_index(&mut self, f1_index: i32) {
        self.f1_index = f1_index;
    }

    /// Get the F2 index.
    pub fn f2_index(&self) -> i32 {
        self.f2_index
    }

    /// Set the F2 index.
    pub fn set_f2_index(&mut self, f2_index: i32) {
        self.f2_index = f2_index;
    }

    /// Get the window time delta.
    pub fn window_time_delta(&self) -> WindowTimeDelta {
        self.window_time_delta
    }

    /// Set the window time delta.
    pub fn set_window_time_delta(&mut self, window_time_delta: WindowTimeDelta) {
        self.window_time_delta = window_time_delta;
    }

    /// Gets the size of the spectral field in 32-bit words.
    pub fn size_words(&self) -> u16 {
        14
    }
}

impl fmt::Display for Spectrum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Spectrum:")?;
        writeln!(f, "  Spectrum type: {:x}", self.spectrum_type)?;
        writeln!(f, "  Window type: {:x}", self.window_type)?;
        writeln!(f, "  Num transform points: {}", self.num_transform_points())?;
        writeln!(f, "  Num window points: {}", self.num_window_points())?;
        writeln!(f, "  Resolution: {} Hz", self.resolution_hz())?;
        writeln!(f, "  Span: {} Hz", self.span_hz())?;
        writeln!(f, "  Num averages: {}", self.num_averages())?;
        writeln!(f, "  Weighting factor: {}", self.weighting_factor())?;
        writeln!(f, "  F1 index: {}", self.f1_index())?;
        writeln!(f, "  F2 index: {}", self.f2_index())?;
        match self.window_time_delta_interpretation() {
            WindowTimeDeltaInterpretation::PercentOverlap => {
                writeln!(
                    f,
                    "  Window time-delta: {}%",
                    self.window_time_delta.as_percent_overlap()
                )?;
            }
            WindowTimeDeltaInterpretation::Samples => {
                writeln!(
                    f,
                    "  Window time-delta: {} samples",
                    self.window_time_delta.as_samples()
                )?;
            }
            WindowTimeDeltaInterpretation::Time => {
                writeln!(
                    f,
                    "  Window time-delta: {} ns",
                    self.window_time_delta.as_time_ns()
                )?;
            }
            _ => {
                writeln!(f, "  Window time-delta: {}", self.window_time_delta.0)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_descriptor_fields() {
        let mut s = Spectrum::new();
        s.set_spectrum_type(SpectrumType::LogPowerDb).unwrap();
        s.set_averaging_type(AveragingType::Linear).unwrap();
        assert_eq!(s.spectrum_type_as_u32(), 0x101);
        assert_eq!(s.spectrum_type(), SpectrumType::LogPowerDb);
        assert_eq!(s.averaging_type(), AveragingType::Linear);
        assert!(s.set_spectrum_type(SpectrumType::Reserved).is_err());
        assert!(s.set_spectrum_type(SpectrumType::UserDefined(5)).is_err());
    }

    #[test]
    fn window_type_round_trip() {
        let mut s = Spectrum::new();
        s.set_window_type(WindowType::Hamming).unwrap();
        assert_eq!(s.window_type(), WindowType::Hamming);
        s.set_window_type(WindowType::Other(200)).unwrap();
        assert_eq!(s.window_type(), WindowType::Other(200));
        assert!(s.set_window_type(WindowType::Reserved).is_err());
    }

    #[test]
    fn spectral_extents() {
        let mut s = Spectrum::new();
        s.set_num_transform_points(1280);
        s.set_resolution_hz(6.25e3);
        s.set_span_hz(8e6);
        s.set_f1_index(-640);
        s.set_f2_index(639);
        assert_eq!(s.num_transform_points(), 1280);
        assert_eq!(s.resolution_hz(), 6.25e3);
        assert_eq!(s.span_hz(), 8e6);
        assert_eq!(s.f1_index(), -640);
        assert_eq!(s.size_words(), 14);
    }
}
