// Domain parameters of the built-in groups. Each group is the order-q subgroup
// of (Z/pZ)* with p = q * r + 1; all groups share q = 2^256 - 189.
// Values are big-endian byte strings.

/// The 256-bit subgroup order shared by every built-in group.
pub const Q_BYTES: [u8; 32] = [
    255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255,
    255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 67,
];

/// 512-bit modulus of the test group.
pub const TEST_P_BYTES: [u8; 64] = [
    212, 241, 31, 137, 154, 35, 162, 46, 67, 168, 155, 48, 22, 35, 221, 17,
    13, 236, 114, 119, 162, 3, 153, 142, 59, 48, 1, 214, 96, 198, 113, 158,
    201, 251, 183, 105, 51, 177, 67, 216, 12, 133, 109, 127, 167, 133, 202, 104,
    184, 111, 125, 173, 99, 87, 161, 254, 77, 142, 164, 186, 141, 125, 169, 181,
];
/// Cofactor of the test group.
pub const TEST_R_BYTES: [u8; 32] = [
    212, 241, 31, 137, 154, 35, 162, 46, 67, 168, 155, 48, 22, 35, 221, 17,
    13, 236, 114, 119, 162, 3, 153, 142, 59, 48, 1, 214, 96, 198, 114, 60,
];
/// Generator of the test group.
pub const TEST_G_BYTES: [u8; 64] = [
    91, 2, 106, 46, 247, 162, 71, 196, 227, 46, 39, 229, 113, 56, 237, 192,
    28, 93, 187, 229, 252, 8, 57, 35, 38, 128, 200, 56, 56, 141, 6, 153,
    155, 68, 49, 112, 243, 107, 16, 249, 171, 208, 228, 49, 16, 36, 165, 127,
    124, 105, 253, 108, 156, 116, 73, 224, 132, 12, 122, 178, 111, 155, 251, 138,
];

/// 2048-bit modulus of the production group.
pub const PRODUCTION_P_BYTES: [u8; 256] = [
    128, 245, 12, 62, 174, 188, 124, 86, 178, 152, 130, 22, 243, 188, 187, 128,
    88, 17, 243, 132, 70, 92, 196, 109, 220, 81, 199, 175, 86, 56, 5, 107,
    126, 238, 99, 153, 117, 13, 45, 199, 30, 234, 238, 217, 77, 4, 135, 88,
    106, 142, 27, 41, 223, 60, 167, 28, 190, 160, 150, 11, 126, 46, 232, 34,
    14, 118, 141, 202, 194, 80, 176, 90, 207, 61, 96, 184, 183, 38, 108, 129,
    27, 228, 93, 127, 85, 8, 215, 188, 5, 175, 173, 251, 166, 162, 14, 151,
    203, 109, 126, 36, 37, 212, 107, 170, 140, 10, 165, 11, 187, 226, 239, 223,
    49, 91, 4, 196, 128, 166, 114, 103, 178, 126, 93, 60, 230, 195, 35, 197,
    240, 126, 89, 182, 127, 232, 166, 16, 248, 88, 145, 83, 142, 11, 119, 173,
    237, 134, 1, 149, 242, 154, 44, 6, 250, 3, 63, 76, 192, 75, 40, 170,
    163, 162, 166, 60, 163, 198, 4, 250, 55, 202, 55, 39, 149, 202, 58, 47,
    202, 31, 198, 235, 168, 32, 223, 60, 69, 157, 122, 26, 125, 124, 194, 49,
    156, 158, 216, 59, 235, 160, 25, 39, 44, 118, 20, 112, 136, 36, 63, 211,
    59, 53, 86, 2, 210, 40, 247, 46, 181, 108, 28, 218, 120, 151, 226, 58,
    202, 77, 161, 183, 58, 103, 54, 95, 58, 170, 51, 133, 175, 237, 66, 90,
    104, 43, 26, 225, 229, 145, 104, 20, 130, 0, 25, 223, 225, 255, 127, 67,
];
/// Cofactor of the production group.
pub const PRODUCTION_R_BYTES: [u8; 224] = [
    128, 245, 12, 62, 174, 188, 124, 86, 178, 152, 130, 22, 243, 188, 187, 128,
    88, 17, 243, 132, 70, 92, 196, 109, 220, 81, 199, 175, 86, 56, 5, 202,
    179, 216, 109, 224, 118, 52, 249, 200, 249, 130, 249, 203, 63, 90, 245, 25,
    111, 206, 227, 209, 209, 185, 172, 56, 103, 1, 2, 126, 37, 139, 46, 200,
    213, 63, 172, 130, 7, 109, 25, 187, 4, 239, 203, 198, 125, 77, 96, 72,
    167, 162, 143, 103, 43, 28, 253, 96, 17, 110, 133, 29, 94, 99, 152, 221,
    59, 111, 218, 35, 161, 96, 106, 189, 49, 20, 22, 150, 62, 3, 5, 130,
    244, 94, 227, 239, 85, 13, 130, 84, 145, 22, 163, 235, 150, 74, 255, 26,
    210, 18, 102, 4, 164, 23, 115, 190, 52, 45, 62, 63, 86, 70, 137, 92,
    87, 148, 73, 71, 189, 147, 100, 118, 23, 186, 68, 58, 181, 169, 127, 119,
    187, 55, 247, 169, 201, 22, 120, 102, 189, 49, 43, 234, 71, 221, 163, 92,
    114, 153, 224, 226, 157, 242, 10, 107, 202, 33, 217, 114, 155, 159, 221, 150,
    212, 240, 176, 149, 97, 54, 253, 0, 217, 195, 128, 103, 150, 197, 219, 19,
    214, 208, 93, 81, 109, 218, 168, 194, 240, 105, 166, 119, 93, 158, 122, 150,
];
/// Generator of the production group.
pub const PRODUCTION_G_BYTES: [u8; 256] = [
    85, 23, 67, 239, 87, 24, 44, 23, 235, 237, 73, 119, 150, 126, 158, 16,
    105, 75, 242, 203, 8, 137, 1, 27, 213, 157, 90, 62, 5, 195, 9, 109,
    208, 205, 100, 113, 123, 238, 42, 44, 67, 253, 148, 2, 29, 172, 118, 91,
    93, 81, 99, 162, 104, 211, 114, 182, 45, 183, 236, 109, 132, 223, 26, 201,
    145, 144, 18, 234, 195, 214, 77, 100, 246, 38, 59, 137, 102, 163, 84, 113,
    216, 83, 163, 28, 253, 53, 82, 62, 243, 15, 201, 248, 33, 212, 31, 232,
    8, 102, 11, 152, 241, 98, 180, 64, 161, 155, 218, 36, 121, 54, 94, 121,
    97, 14, 172, 233, 23, 224, 80, 146, 219, 45, 100, 80, 115, 132, 244, 3,
    187, 95, 218, 223, 175, 62, 90, 118, 152, 42, 225, 247, 246, 1, 154, 227,
    57, 4, 241, 92, 252, 73, 169, 144, 194, 109, 199, 165, 89, 26, 202, 122,
    100, 202, 17, 91, 66, 232, 171, 86, 246, 93, 102, 90, 79, 108, 183, 162,
    5, 158, 91, 233, 162, 77, 56, 200, 102, 240, 67, 214, 128, 66, 106, 190,
    6, 39, 248, 120, 26, 38, 155, 107, 63, 73, 146, 219, 238, 156, 113, 235,
    12, 95, 100, 177, 122, 81, 203, 17, 22, 74, 113, 131, 148, 92, 51, 143,
    253, 60, 67, 50, 165, 151, 184, 23, 189, 36, 16, 114, 151, 14, 149, 201,
    157, 127, 17, 225, 177, 233, 233, 230, 87, 165, 157, 156, 103, 121, 67, 225,
];
