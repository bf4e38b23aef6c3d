//! wiringPi pin numbering for the Raspberry Pi 40-pin header.

/// Broadcom GPIO for each wiringPi pin, board revision 2 and later.
/// Pins 17-20 sit on the P5 header of the original Model B rev2.
const WPI_TO_BCM: [u32; 32] = [
    17, 18, 27, 22, 23, 24, 25, 4, // 0-7
    2, 3, 8, 7, 10, 9, 11, 14, // 8-15
    15, 28, 29, 30, 31, 5, 6, 13, // 16-23
    19, 26, 12, 16, 20, 21, 0, 1, // 24-31
];

/// Broadcom GPIO number for wiringPi pin `wpi`, if the header has one.
pub fn bcm_line(wpi: u32) -> Option<u32> {
    WPI_TO_BCM.get(wpi as usize).copied()
}
