// Audio server plug-in constants
//
// Four-character codes for the selectors, scopes, classes and status values
// that the host's audio server speaks. These mirror the values of the
// AudioServerPlugIn / AudioHardwareBase headers so that a thin FFI shim can
// pass them straight through.

#![allow(non_upper_case_globals)]

/// Build a four-character code the way the audio headers spell them ('glob').
pub const fn fourcc(code: &[u8; 4]) -> u32 {
    u32::from_be_bytes(*code)
}

/// Render a four-character code for log output.
pub fn fourcc_to_string(code: u32) -> String {
    code.to_be_bytes()
        .iter()
        .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '.' })
        .collect()
}

// Well-known object identifiers
pub const kAudioObjectUnknown: u32 = 0;
pub const kAudioObjectPlugInObject: u32 = 1;

// Scopes and elements
pub const kAudioObjectPropertyScopeGlobal: u32 = fourcc(b"glob");
pub const kAudioObjectPropertyScopeInput: u32 = fourcc(b"inpt");
pub const kAudioObjectPropertyScopeOutput: u32 = fourcc(b"outp");
pub const kAudioObjectPropertyElementMain: u32 = 0;

// Class identifiers
pub const kAudioObjectClassID: u32 = fourcc(b"aobj");
pub const kAudioPlugInClassID: u32 = fourcc(b"aplg");
pub const kAudioBoxClassID: u32 = fourcc(b"abox");
pub const kAudioDeviceClassID: u32 = fourcc(b"adev");
pub const kAudioStreamClassID: u32 = fourcc(b"astr");
pub const kAudioLevelControlClassID: u32 = fourcc(b"levl");
pub const kAudioVolumeControlClassID: u32 = fourcc(b"vlme");
pub const kAudioBooleanControlClassID: u32 = fourcc(b"togl");
pub const kAudioMuteControlClassID: u32 = fourcc(b"mute");

// AudioObject selectors
pub const kAudioObjectPropertyBaseClass: u32 = fourcc(b"bcls");
pub const kAudioObjectPropertyClass: u32 = fourcc(b"clas");
pub const kAudioObjectPropertyOwner: u32 = fourcc(b"stdv");
pub const kAudioObjectPropertyName: u32 = fourcc(b"lnam");
pub const kAudioObjectPropertyModelName: u32 = fourcc(b"lmod");
pub const kAudioObjectPropertyManufacturer: u32 = fourcc(b"lmak");
pub const kAudioObjectPropertyOwnedObjects: u32 = fourcc(b"ownd");
pub const kAudioObjectPropertyIdentify: u32 = fourcc(b"iden");
pub const kAudioObjectPropertySerialNumber: u32 = fourcc(b"snum");
pub const kAudioObjectPropertyFirmwareVersion: u32 = fourcc(b"fwvn");
pub const kAudioObjectPropertyControlList: u32 = fourcc(b"ctrl");

// PlugIn selectors
pub const kAudioPlugInPropertyBoxList: u32 = fourcc(b"box#");
pub const kAudioPlugInPropertyTranslateUIDToBox: u32 = fourcc(b"uidb");
pub const kAudioPlugInPropertyDeviceList: u32 = fourcc(b"dev#");
pub const kAudioPlugInPropertyTranslateUIDToDevice: u32 = fourcc(b"uidd");
pub const kAudioPlugInPropertyResourceBundle: u32 = fourcc(b"rsrc");

// Box selectors
pub const kAudioBoxPropertyBoxUID: u32 = fourcc(b"buid");
pub const kAudioBoxPropertyTransportType: u32 = fourcc(b"tran");
pub const kAudioBoxPropertyHasAudio: u32 = fourcc(b"bhau");
pub const kAudioBoxPropertyHasVideo: u32 = fourcc(b"bhvi");
pub const kAudioBoxPropertyHasMIDI: u32 = fourcc(b"bhmi");
pub const kAudioBoxPropertyIsProtected: u32 = fourcc(b"bpro");
pub const kAudioBoxPropertyAcquired: u32 = fourcc(b"bxon");
pub const kAudioBoxPropertyAcquisitionFailed: u32 = fourcc(b"bxof");
pub const kAudioBoxPropertyDeviceList: u32 = fourcc(b"bdv#");

// Device selectors
pub const kAudioDevicePropertyDeviceUID: u32 = fourcc(b"uid ");
pub const kAudioDevicePropertyModelUID: u32 = fourcc(b"muid");
pub const kAudioDevicePropertyTransportType: u32 = fourcc(b"tran");
pub const kAudioDevicePropertyRelatedDevices: u32 = fourcc(b"akin");
pub const kAudioDevicePropertyClockDomain: u32 = fourcc(b"clkd");
pub const kAudioDevicePropertyDeviceIsAlive: u32 = fourcc(b"livn");
pub const kAudioDevicePropertyDeviceIsRunning: u32 = fourcc(b"goin");
pub const kAudioDevicePropertyDeviceCanBeDefaultDevice: u32 = fourcc(b"dflt");
pub const kAudioDevicePropertyDeviceCanBeDefaultSystemDevice: u32 = fourcc(b"sflt");
pub const kAudioDevicePropertyLatency: u32 = fourcc(b"ltnc");
pub const kAudioDevicePropertyStreams: u32 = fourcc(b"stm#");
pub const kAudioDevicePropertySafetyOffset: u32 = fourcc(b"saft");
pub const kAudioDevicePropertyNominalSampleRate: u32 = fourcc(b"nsrt");
pub const kAudioDevicePropertyAvailableNominalSampleRates: u32 = fourcc(b"nsr#");
pub const kAudioDevicePropertyIsHidden: u32 = fourcc(b"hidn");
pub const kAudioDevicePropertyPreferredChannelsForStereo: u32 = fourcc(b"dch2");
pub const kAudioDevicePropertyPreferredChannelLayout: u32 = fourcc(b"srnd");
pub const kAudioDevicePropertyZeroTimeStampPeriod: u32 = fourcc(b"ring");
pub const kAudioDevicePropertyIcon: u32 = fourcc(b"icon");

// Stream selectors
pub const kAudioStreamPropertyIsActive: u32 = fourcc(b"sact");
pub const kAudioStreamPropertyDirection: u32 = fourcc(b"sdir");
pub const kAudioStreamPropertyTerminalType: u32 = fourcc(b"term");
pub const kAudioStreamPropertyStartingChannel: u32 = fourcc(b"schn");
pub const kAudioStreamPropertyLatency: u32 = fourcc(b"ltnc");
pub const kAudioStreamPropertyVirtualFormat: u32 = fourcc(b"sfmt");
pub const kAudioStreamPropertyPhysicalFormat: u32 = fourcc(b"pft ");
pub const kAudioStreamPropertyAvailableVirtualFormats: u32 = fourcc(b"sfma");
pub const kAudioStreamPropertyAvailablePhysicalFormats: u32 = fourcc(b"pft#");

// Control selectors
pub const kAudioControlPropertyScope: u32 = fourcc(b"cscp");
pub const kAudioControlPropertyElement: u32 = fourcc(b"celm");
pub const kAudioLevelControlPropertyScalarValue: u32 = fourcc(b"lcsv");
pub const kAudioLevelControlPropertyDecibelValue: u32 = fourcc(b"lcdv");
pub const kAudioLevelControlPropertyDecibelRange: u32 = fourcc(b"lcdr");
pub const kAudioLevelControlPropertyConvertScalarToDecibels: u32 = fourcc(b"lcsd");
pub const kAudioLevelControlPropertyConvertDecibelsToScalar: u32 = fourcc(b"lcds");
pub const kAudioBooleanControlPropertyValue: u32 = fourcc(b"bcvl");

// Property values
pub const kAudioDeviceTransportTypeVirtual: u32 = fourcc(b"virt");
pub const kAudioStreamTerminalTypeMicrophone: u32 = fourcc(b"micr");
pub const kAudioStreamTerminalTypeSpeaker: u32 = fourcc(b"spkr");
pub const kAudioFormatLinearPCM: u32 = fourcc(b"lpcm");
pub const kAudioFormatFlagIsFloat: u32 = 1 << 0;
pub const kAudioFormatFlagIsBigEndian: u32 = 1 << 1;
pub const kAudioFormatFlagIsPacked: u32 = 1 << 3;
#[cfg(target_endian = "big")]
pub const kAudioFormatFlagsNativeEndian: u32 = kAudioFormatFlagIsBigEndian;
#[cfg(target_endian = "little")]
pub const kAudioFormatFlagsNativeEndian: u32 = 0;
pub const kAudioChannelLayoutTag_UseChannelDescriptions: u32 = 0;
pub const kAudioChannelLabel_Left: u32 = 1;

// IO operations
pub const kAudioServerPlugInIOOperationThread: u32 = fourcc(b"thrd");
pub const kAudioServerPlugInIOOperationCycle: u32 = fourcc(b"cycl");
pub const kAudioServerPlugInIOOperationReadInput: u32 = fourcc(b"read");
pub const kAudioServerPlugInIOOperationConvertInput: u32 = fourcc(b"cinp");
pub const kAudioServerPlugInIOOperationProcessInput: u32 = fourcc(b"pinp");
pub const kAudioServerPlugInIOOperationProcessOutput: u32 = fourcc(b"pout");
pub const kAudioServerPlugInIOOperationMixOutput: u32 = fourcc(b"mixo");
pub const kAudioServerPlugInIOOperationProcessMix: u32 = fourcc(b"pmix");
pub const kAudioServerPlugInIOOperationConvertMix: u32 = fourcc(b"cmix");
pub const kAudioServerPlugInIOOperationWriteMix: u32 = fourcc(b"rmix");

// Status codes
pub const kAudioHardwareNoError: i32 = 0;
pub const kAudioHardwareUnspecifiedError: i32 = fourcc(b"what") as i32;
pub const kAudioHardwareUnknownPropertyError: i32 = fourcc(b"who?") as i32;
pub const kAudioHardwareBadPropertySizeError: i32 = fourcc(b"!siz") as i32;
pub const kAudioHardwareIllegalOperationError: i32 = fourcc(b"nope") as i32;
pub const kAudioHardwareBadObjectError: i32 = fourcc(b"!obj") as i32;
pub const kAudioHardwareUnsupportedOperationError: i32 = fourcc(b"unop") as i32;
pub const kAudioDeviceUnsupportedFormatError: i32 = fourcc(b"!dat") as i32;

// Wire sizes of the C structures the host exchanges, in bytes.
pub const SIZE_OF_OBJECT_ID: usize = 4;
pub const SIZE_OF_U32: usize = 4;
pub const SIZE_OF_F32: usize = 4;
pub const SIZE_OF_F64: usize = 8;
pub const SIZE_OF_CF_REF: usize = std::mem::size_of::<usize>();
pub const SIZE_OF_VALUE_RANGE: usize = 16;
pub const SIZE_OF_STREAM_BASIC_DESCRIPTION: usize = 40;
pub const SIZE_OF_STREAM_RANGED_DESCRIPTION: usize = 56;
pub const SIZE_OF_CHANNEL_LAYOUT_HEADER: usize = 12;
pub const SIZE_OF_CHANNEL_DESCRIPTION: usize = 20;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fourcc_matches_header_values() {
        assert_eq!(kAudioObjectPropertyScopeGlobal, 0x676C_6F62);
        assert_eq!(kAudioDevicePropertyNominalSampleRate, 1853059700);
        assert_eq!(kAudioHardwareBadObjectError, 560947818);
        assert_eq!(kAudioHardwareUnknownPropertyError, 2003332927);
    }

    #[test]
    fn test_fourcc_to_string() {
        assert_eq!(fourcc_to_string(kAudioDevicePropertyDeviceUID), "uid ");
        assert_eq!(fourcc_to_string(kAudioPlugInPropertyDeviceList), "dev#");
        assert_eq!(fourcc_to_string(0x0102_0304), "....");
    }
}
