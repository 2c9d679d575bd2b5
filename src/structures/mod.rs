pub mod fft;
pub mod interval;
pub mod poly;
pub mod sturm;
