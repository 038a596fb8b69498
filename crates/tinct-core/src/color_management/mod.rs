//! Color management: conversion between device sRGB and the perceptual L*a*b* space.

pub mod lab;

pub use lab::{lab_to_rgb_pixel, rgb_to_lab_pixel, to_perceptual, to_rgb};
