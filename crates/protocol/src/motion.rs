//! Motion (id 0) and Motion Ex (id 13) packets.

use crate::error::DecodeError;
use crate::reader::ByteReader;
use crate::{HEADER_SIZE, MOTION_ENTRY_SIZE, MOTION_EX_PACKET_SIZE, MOTION_PACKET_SIZE, NUM_CARS};

/// World-space motion of one car (60 bytes on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CarMotionData {
    pub world_position_x: f32,
    pub world_position_y: f32,
    pub world_position_z: f32,
    pub world_velocity_x: f32,
    pub world_velocity_y: f32,
    pub world_velocity_z: f32,
    /// Normalised direction vectors, components scaled to i16 range.
    pub world_forward_dir_x: i16,
    pub world_forward_dir_y: i16,
    pub world_forward_dir_z: i16,
    pub world_right_dir_x: i16,
    pub world_right_dir_y: i16,
    pub world_right_dir_z: i16,
    pub g_force_lateral: f32,
    pub g_force_longitudinal: f32,
    pub g_force_vertical: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
}

/// Motion packet: one entry per grid slot.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionPacket {
    pub cars: Vec<CarMotionData>,
}

/// Decode a Motion packet (id 0).
///
/// # Errors
///
/// [`DecodeError::TooShort`] if `raw` is shorter than 1349 bytes.
pub fn decode_motion(raw: &[u8]) -> Result<MotionPacket, DecodeError> {
    if raw.len() < MOTION_PACKET_SIZE {
        return Err(DecodeError::TooShort {
            needed: MOTION_PACKET_SIZE,
            len: raw.len(),
        });
    }

    let mut cars = Vec::with_capacity(NUM_CARS);
    for index in 0..NUM_CARS {
        let mut r = ByteReader::at(raw, HEADER_SIZE + index * MOTION_ENTRY_SIZE);
        cars.push(CarMotionData {
            world_position_x: r.f32_le()?,      // 0-3
            world_position_y: r.f32_le()?,      // 4-7
            world_position_z: r.f32_le()?,      // 8-11
            world_velocity_x: r.f32_le()?,      // 12-15
            world_velocity_y: r.f32_le()?,      // 16-19
            world_velocity_z: r.f32_le()?,      // 20-23
            world_forward_dir_x: r.i16_le()?,   // 24-25
            world_forward_dir_y: r.i16_le()?,   // 26-27
            world_forward_dir_z: r.i16_le()?,   // 28-29
            world_right_dir_x: r.i16_le()?,     // 30-31
            world_right_dir_y: r.i16_le()?,     // 32-33
            world_right_dir_z: r.i16_le()?,     // 34-35
            g_force_lateral: r.f32_le()?,       // 36-39
            g_force_longitudinal: r.f32_le()?,  // 40-43
            g_force_vertical: r.f32_le()?,      // 44-47
            yaw: r.f32_le()?,                   // 48-51
            pitch: r.f32_le()?,                 // 52-55
            roll: r.f32_le()?,                  // 56-59
        });
    }
    Ok(MotionPacket { cars })
}

/// Extended motion data for the player's car only (id 13, 61 × f32).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MotionExPacket {
    /// Suspension position per wheel, RL RR FL FR.
    pub suspension_position: [f32; 4],
    pub suspension_velocity: [f32; 4],
    pub suspension_acceleration: [f32; 4],
    pub wheel_speed: [f32; 4],
    pub wheel_slip_ratio: [f32; 4],
    pub wheel_slip_angle: [f32; 4],
    pub wheel_lat_force: [f32; 4],
    pub wheel_long_force: [f32; 4],
    pub height_of_cog_above_ground: f32,
    pub local_velocity_x: f32,
    pub local_velocity_y: f32,
    pub local_velocity_z: f32,
    pub angular_velocity_x: f32,
    pub angular_velocity_y: f32,
    pub angular_velocity_z: f32,
    pub angular_acceleration_x: f32,
    pub angular_acceleration_y: f32,
    pub angular_acceleration_z: f32,
    pub front_wheels_angle: f32,
    pub wheel_vert_force: [f32; 4],
    pub front_aero_height: f32,
    pub rear_aero_height: f32,
    pub front_roll_angle: f32,
    pub rear_roll_angle: f32,
    pub chassis_yaw: f32,
    pub chassis_pitch: f32,
    pub wheel_camber: [f32; 4],
    pub wheel_camber_gain: [f32; 4],
}

/// Decode a Motion Ex packet (id 13).
///
/// # Errors
///
/// [`DecodeError::TooShort`] if `raw` is shorter than 273 bytes.
pub fn decode_motion_ex(raw: &[u8]) -> Result<MotionExPacket, DecodeError> {
    if raw.len() < MOTION_EX_PACKET_SIZE {
        return Err(DecodeError::TooShort {
            needed: MOTION_EX_PACKET_SIZE,
            len: raw.len(),
        });
    }

    let mut r = ByteReader::at(raw, HEADER_SIZE);
    Ok(MotionExPacket {
        suspension_position: r.f32_le_array::<4>()?,
        suspension_velocity: r.f32_le_array::<4>()?,
        suspension_acceleration: r.f32_le_array::<4>()?,
        wheel_speed: r.f32_le_array::<4>()?,
        wheel_slip_ratio: r.f32_le_array::<4>()?,
        wheel_slip_angle: r.f32_le_array::<4>()?,
        wheel_lat_force: r.f32_le_array::<4>()?,
        wheel_long_force: r.f32_le_array::<4>()?,
        height_of_cog_above_ground: r.f32_le()?,
        local_velocity_x: r.f32_le()?,
        local_velocity_y: r.f32_le()?,
        local_velocity_z: r.f32_le()?,
        angular_velocity_x: r.f32_le()?,
        angular_velocity_y: r.f32_le()?,
        angular_velocity_z: r.f32_le()?,
        angular_acceleration_x: r.f32_le()?,
        angular_acceleration_y: r.f32_le()?,
        angular_acceleration_z: r.f32_le()?,
        front_wheels_angle: r.f32_le()?,
        wheel_vert_force: r.f32_le_array::<4>()?,
        front_aero_height: r.f32_le()?,
        rear_aero_height: r.f32_le()?,
        front_roll_angle: r.f32_le()?,
        rear_roll_angle: r.f32_le()?,
        chassis_yaw: r.f32_le()?,
        chassis_pitch: r.f32_le()?,
        wheel_camber: r.f32_le_array::<4>()?,
        wheel_camber_gain: r.f32_le_array::<4>()?,
    })
}
